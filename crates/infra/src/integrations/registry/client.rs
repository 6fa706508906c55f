//! Attendance-registry adapter over the export/form-post surface.

use std::time::Duration;

use async_trait::async_trait;
use gavel_core::sync::ports::RegistryClient;
use gavel_domain::{Breakout, BreakoutParams, GavelError, Result, UserContext};
use reqwest::Client;
use tracing::{debug, instrument};

use super::export::decode_export;
use crate::errors::InfraError;
use crate::integrations::response_error;

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Export/form-post implementation of the registry client port.
///
/// Writes go through form posts; reads (including the read-back after a
/// write) go through the CSV export. Every call authenticates with the
/// calling user's registry session token.
pub struct HttpRegistryClient {
    base_url: String,
    http: Client,
}

impl HttpRegistryClient {
    /// Create a new client against the registration system's base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(InfraError::from)?;
        Ok(Self { base_url: base_url.into(), http })
    }

    fn export_url(&self, registry_meeting_id: i64) -> String {
        format!("{}/meetings/{registry_meeting_id}/breakouts.csv", self.base_url)
    }

    fn breakouts_url(&self, registry_meeting_id: i64) -> String {
        format!("{}/meetings/{registry_meeting_id}/breakouts", self.base_url)
    }

    fn breakout_url(&self, registry_meeting_id: i64, breakout_id: i64) -> String {
        format!("{}/meetings/{registry_meeting_id}/breakouts/{breakout_id}", self.base_url)
    }

    /// Fetch and decode the breakout export for one registry meeting.
    async fn fetch_export(
        &self,
        user: &UserContext,
        registry_meeting_id: i64,
    ) -> Result<Vec<Breakout>> {
        let token = user.registry_token()?;
        let response = self
            .http
            .get(self.export_url(registry_meeting_id))
            .bearer_auth(token)
            .send()
            .await
            .map_err(InfraError::from)?;
        if !response.status().is_success() {
            return Err(response_error("breakout export", response).await);
        }
        let body = response.text().await.map_err(InfraError::from)?;
        decode_export(registry_meeting_id, &body)
    }

    fn form_fields(params: &BreakoutParams) -> Vec<(&'static str, String)> {
        vec![
            ("name", params.name.clone()),
            ("location", params.location.clone()),
            ("description", params.description.clone().unwrap_or_default()),
            ("day", params.day.to_string()),
            ("start_slot", params.start_slot_id.to_string()),
            ("end_slot", params.end_slot_id.to_string()),
            ("credit", params.credit.as_str().to_string()),
            ("facilitator", params.facilitator.clone().unwrap_or_default()),
        ]
    }
}

#[async_trait]
impl RegistryClient for HttpRegistryClient {
    #[instrument(skip(self, user, params), fields(user_id = user.user_id))]
    async fn add(
        &self,
        user: &UserContext,
        registry_meeting_id: i64,
        params: &BreakoutParams,
    ) -> Result<Breakout> {
        let token = user.registry_token()?;
        let response = self
            .http
            .post(self.breakouts_url(registry_meeting_id))
            .bearer_auth(token)
            .form(&Self::form_fields(params))
            .send()
            .await
            .map_err(InfraError::from)?;
        if !response.status().is_success() {
            return Err(response_error("breakout create", response).await);
        }

        // The post surface returns HTML, so the created record is read back
        // from the export: newest row matching the posted grid position and
        // name (the registry enforces uniqueness there).
        let breakouts = self.fetch_export(user, registry_meeting_id).await?;
        let created = breakouts
            .into_iter()
            .filter(|b| {
                b.name == params.name
                    && b.day == params.day
                    && b.start_slot_id == params.start_slot_id
                    && b.end_slot_id == params.end_slot_id
            })
            .max_by_key(|b| b.id)
            .ok_or_else(|| {
                GavelError::Network("created breakout missing from export read-back".into())
            })?;
        debug!(registry_meeting_id, breakout_id = created.id, "breakout created");
        Ok(created)
    }

    #[instrument(skip(self, user, params), fields(user_id = user.user_id))]
    async fn update(
        &self,
        user: &UserContext,
        registry_meeting_id: i64,
        breakout_id: i64,
        params: &BreakoutParams,
    ) -> Result<Breakout> {
        let token = user.registry_token()?;
        let response = self
            .http
            .post(self.breakout_url(registry_meeting_id, breakout_id))
            .bearer_auth(token)
            .form(&Self::form_fields(params))
            .send()
            .await
            .map_err(InfraError::from)?;
        if !response.status().is_success() {
            return Err(response_error("breakout update", response).await);
        }

        self.get(user, registry_meeting_id, breakout_id).await
    }

    #[instrument(skip(self, user), fields(user_id = user.user_id))]
    async fn get(
        &self,
        user: &UserContext,
        registry_meeting_id: i64,
        breakout_id: i64,
    ) -> Result<Breakout> {
        self.fetch_export(user, registry_meeting_id)
            .await?
            .into_iter()
            .find(|b| b.id == breakout_id)
            .ok_or_else(|| {
                GavelError::NotFound(format!(
                    "breakout {breakout_id} under registry meeting {registry_meeting_id}"
                ))
            })
    }

    #[instrument(skip(self, user), fields(user_id = user.user_id))]
    async fn delete(
        &self,
        user: &UserContext,
        registry_meeting_id: i64,
        breakout_ids: &[i64],
    ) -> Result<usize> {
        let token = user.registry_token()?;
        let existing = self.fetch_export(user, registry_meeting_id).await?;
        let present: Vec<i64> = breakout_ids
            .iter()
            .copied()
            .filter(|id| existing.iter().any(|b| b.id == *id))
            .collect();
        if present.is_empty() {
            return Err(GavelError::NotFound(format!(
                "no breakouts {breakout_ids:?} under registry meeting {registry_meeting_id}"
            )));
        }

        let ids = present.iter().map(ToString::to_string).collect::<Vec<_>>().join(",");
        let response = self
            .http
            .post(format!("{}/delete", self.breakouts_url(registry_meeting_id)))
            .bearer_auth(token)
            .form(&[("ids", ids)])
            .send()
            .await
            .map_err(InfraError::from)?;
        if !response.status().is_success() {
            return Err(response_error("breakout delete", response).await);
        }
        debug!(registry_meeting_id, deleted = present.len(), "breakouts deleted");
        Ok(present.len())
    }
}
