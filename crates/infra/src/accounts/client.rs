//! Account-scoped HTTP client with transparent token refresh.

use std::time::Duration;

use gavel_domain::{AccountConfig, GavelError, Result};
use parking_lot::RwLock;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::errors::InfraError;

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// HTTP client bound to one external-service account.
///
/// Holds the account's credential pair and the current access token. A 401
/// triggers one refresh followed by one retry; a second 401 propagates as an
/// auth error. Token writes are writer-wins: whichever refresh lands last
/// sticks, which is harmless because every stored token was just minted.
pub struct AuthorizedClient {
    account_id: i64,
    http: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    refresh_token: String,
    access_token: RwLock<Option<String>>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[allow(dead_code)]
    expires_in: Option<i64>,
}

impl AuthorizedClient {
    /// Build a client for one configured account.
    pub fn new(account: &AccountConfig, token_url: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(InfraError::from)?;
        Ok(Self {
            account_id: account.id,
            http,
            token_url: token_url.to_string(),
            client_id: account.client_id.clone(),
            client_secret: account.client_secret.clone(),
            refresh_token: account.refresh_token.clone(),
            access_token: RwLock::new(None),
        })
    }

    /// The account this client is bound to.
    pub fn account_id(&self) -> i64 {
        self.account_id
    }

    /// Execute a request with bearer auth, refreshing credentials and
    /// retrying once on 401.
    ///
    /// The request is described by a builder closure because a retry needs a
    /// fresh `RequestBuilder`; reqwest builders are single-use.
    pub async fn send<F>(&self, build: F) -> Result<Response>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let token = match self.cached_token() {
            Some(token) => token,
            None => self.refresh().await?,
        };

        let response =
            build(&self.http).bearer_auth(&token).send().await.map_err(InfraError::from)?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        debug!(account_id = self.account_id, "access token rejected; refreshing and retrying");
        let token = self.refresh().await?;
        let response =
            build(&self.http).bearer_auth(&token).send().await.map_err(InfraError::from)?;
        if response.status() == StatusCode::UNAUTHORIZED {
            warn!(account_id = self.account_id, "request still unauthorized after refresh");
            return Err(GavelError::Auth(format!(
                "account {} rejected refreshed credentials",
                self.account_id
            )));
        }
        Ok(response)
    }

    fn cached_token(&self) -> Option<String> {
        self.access_token.read().clone()
    }

    /// Exchange the refresh token for a fresh access token.
    async fn refresh(&self) -> Result<String> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("grant_type", "refresh_token"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", self.refresh_token.as_str()),
            ])
            .send()
            .await
            .map_err(InfraError::from)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GavelError::Auth(format!(
                "token refresh for account {} failed ({status}): {body}",
                self.account_id
            )));
        }

        let token: TokenResponse = response.json().await.map_err(InfraError::from)?;
        *self.access_token.write() = Some(token.access_token.clone());
        debug!(account_id = self.account_id, "access token refreshed");
        Ok(token.access_token)
    }
}
