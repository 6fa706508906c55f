//! Video-conference REST adapter

use std::sync::Arc;

use async_trait::async_trait;
use gavel_core::sync::ports::VideoClient;
use gavel_domain::{Result, VideoConference, VideoConferenceParams};
use tracing::{debug, instrument};

use super::types::{ConferenceRequest, ConferenceResource};
use crate::accounts::AccountClientRegistry;
use crate::errors::InfraError;
use crate::integrations::response_error;

/// REST implementation of the video client port.
///
/// Requests go through the per-account authorized clients, so credential
/// refresh is transparent here.
pub struct HttpVideoClient {
    base_url: String,
    accounts: Arc<AccountClientRegistry>,
}

impl HttpVideoClient {
    /// Create a new client against the given API base URL.
    pub fn new(base_url: impl Into<String>, accounts: Arc<AccountClientRegistry>) -> Self {
        Self { base_url: base_url.into(), accounts }
    }

    fn conferences_url(&self) -> String {
        format!("{}/v1/conferences", self.base_url)
    }

    fn conference_url(&self, conference_id: &str) -> String {
        format!("{}/v1/conferences/{conference_id}", self.base_url)
    }
}

#[async_trait]
impl VideoClient for HttpVideoClient {
    #[instrument(skip(self, params))]
    async fn add(
        &self,
        account_id: i64,
        params: &VideoConferenceParams,
    ) -> Result<VideoConference> {
        let account = self.accounts.client(account_id)?;
        let url = self.conferences_url();
        let body = ConferenceRequest::from(params);

        let response = account.send(|http| http.post(&url).json(&body)).await?;
        if !response.status().is_success() {
            return Err(response_error("video conference create", response).await);
        }
        let resource: ConferenceResource = response.json().await.map_err(InfraError::from)?;
        debug!(account_id, conference_id = %resource.id, "video conference created");
        Ok(resource.into())
    }

    #[instrument(skip(self, params))]
    async fn update(
        &self,
        account_id: i64,
        conference_id: &str,
        params: &VideoConferenceParams,
    ) -> Result<VideoConference> {
        let account = self.accounts.client(account_id)?;
        let url = self.conference_url(conference_id);
        let body = ConferenceRequest::from(params);

        let response = account.send(|http| http.put(&url).json(&body)).await?;
        if !response.status().is_success() {
            return Err(response_error("video conference update", response).await);
        }
        let resource: ConferenceResource = response.json().await.map_err(InfraError::from)?;
        Ok(resource.into())
    }

    #[instrument(skip(self))]
    async fn get(&self, account_id: i64, conference_id: &str) -> Result<VideoConference> {
        let account = self.accounts.client(account_id)?;
        let url = self.conference_url(conference_id);

        let response = account.send(|http| http.get(&url)).await?;
        if !response.status().is_success() {
            return Err(response_error("video conference fetch", response).await);
        }
        let resource: ConferenceResource = response.json().await.map_err(InfraError::from)?;
        Ok(resource.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, account_id: i64, conference_id: &str) -> Result<()> {
        let account = self.accounts.client(account_id)?;
        let url = self.conference_url(conference_id);

        let response = account.send(|http| http.delete(&url)).await?;
        if !response.status().is_success() {
            return Err(response_error("video conference delete", response).await);
        }
        debug!(account_id, conference_id, "video conference deleted");
        Ok(())
    }
}
