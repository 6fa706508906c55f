//! Registry of authorized clients, keyed by account id.

use std::sync::Arc;

use dashmap::DashMap;
use gavel_domain::{GavelError, Result, ServiceConfig};
use tracing::info;

use super::client::AuthorizedClient;

/// Concurrent, read-mostly map of account id to authorized client.
///
/// Written by the startup and auth-completion paths, read by every
/// reconciliation. Registering an account again (after a re-auth) replaces
/// the previous client: writer wins.
#[derive(Default)]
pub struct AccountClientRegistry {
    clients: DashMap<i64, Arc<AuthorizedClient>>,
}

impl AccountClientRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from the configured accounts of one service.
    pub fn from_config(service: &ServiceConfig) -> Result<Self> {
        let registry = Self::new();
        for account in &service.accounts {
            registry.register(Arc::new(AuthorizedClient::new(account, &service.token_url)?));
        }
        info!(accounts = service.accounts.len(), "account client registry populated");
        Ok(registry)
    }

    /// Insert or replace the client for an account.
    pub fn register(&self, client: Arc<AuthorizedClient>) {
        self.clients.insert(client.account_id(), client);
    }

    /// Look up the client for an account.
    ///
    /// An unknown account is an auth error: the caller referenced an account
    /// this deployment holds no credentials for.
    pub fn client(&self, account_id: i64) -> Result<Arc<AuthorizedClient>> {
        self.clients
            .get(&account_id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| GavelError::Auth(format!("no credentials for account {account_id}")))
    }

    /// Number of registered accounts.
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Whether no accounts are registered.
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
