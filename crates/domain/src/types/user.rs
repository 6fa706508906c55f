//! Authenticated caller identity

use serde::{Deserialize, Serialize};

/// Authenticated user on whose behalf a batch operation runs.
///
/// The registry client authenticates with the caller's own registry session
/// token; the account-scoped video/calendar clients carry their own
/// credentials and ignore it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContext {
    pub user_id: i64,
    pub name: String,
    pub registry_token: Option<String>,
}

impl UserContext {
    /// The registry session token, or an auth error when the user has none.
    pub fn registry_token(&self) -> crate::Result<&str> {
        self.registry_token
            .as_deref()
            .ok_or_else(|| crate::GavelError::Auth("no registry session for user".into()))
    }
}
