//! Application configuration structures
//!
//! Loaded by the infrastructure config loader from environment variables or
//! a TOML file; consumed by the api crate when wiring the application
//! context.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_POOL_SIZE;

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub video: ServiceConfig,
    pub calendar: ServiceConfig,
    pub registry: RegistryConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    pub path: String,
    /// Connection pool size
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

fn default_pool_size() -> u32 {
    DEFAULT_POOL_SIZE
}

/// Configuration for an account-scoped external service (video or calendar).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// API base URL
    pub base_url: String,
    /// OAuth token endpoint used for transparent refresh
    pub token_url: String,
    /// Accounts authorized against this service
    #[serde(default)]
    pub accounts: Vec<AccountConfig>,
}

/// One authorized account and its credential pair.
///
/// The OAuth handshake that produced the refresh token happens outside this
/// core; only the refresh flow is exercised here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    pub id: i64,
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

/// Attendance-registry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Base URL of the registration system
    pub base_url: String,
}
