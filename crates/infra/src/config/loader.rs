//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//!
//! ## Environment Variables
//! - `GAVEL_DB_PATH`: Database file path
//! - `GAVEL_DB_POOL_SIZE`: Connection pool size (optional)
//! - `GAVEL_VIDEO_BASE_URL` / `GAVEL_VIDEO_TOKEN_URL`: Video service endpoints
//! - `GAVEL_CALENDAR_BASE_URL` / `GAVEL_CALENDAR_TOKEN_URL`: Calendar service
//!   endpoints
//! - `GAVEL_REGISTRY_BASE_URL`: Attendance-registry base URL
//!
//! Account credential pairs cannot be expressed as environment variables;
//! the env path yields empty account lists, which the auth-completion flow
//! populates at runtime.
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./gavel.toml` (current working directory)
//! 2. `./config.toml` (current working directory)
//! 3. `../gavel.toml` (parent directory)

use std::path::{Path, PathBuf};

use gavel_domain::constants::DEFAULT_POOL_SIZE;
use gavel_domain::{Config, DatabaseConfig, GavelError, RegistryConfig, Result, ServiceConfig};

/// Load configuration with automatic fallback strategy.
///
/// # Errors
/// Returns `GavelError::Config` if configuration cannot be loaded from
/// either source.
pub fn load() -> Result<Config> {
    dotenvy::dotenv().ok();

    match load_from_env() {
        Ok(config) => {
            tracing::info!("configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "environment configuration incomplete, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables.
///
/// # Errors
/// Returns `GavelError::Config` if required variables are missing or have
/// invalid values.
pub fn load_from_env() -> Result<Config> {
    let pool_size = match std::env::var("GAVEL_DB_POOL_SIZE") {
        Ok(raw) => raw
            .parse()
            .map_err(|_| GavelError::Config(format!("invalid GAVEL_DB_POOL_SIZE: {raw}")))?,
        Err(_) => DEFAULT_POOL_SIZE,
    };

    Ok(Config {
        database: DatabaseConfig { path: env_var("GAVEL_DB_PATH")?, pool_size },
        video: ServiceConfig {
            base_url: env_var("GAVEL_VIDEO_BASE_URL")?,
            token_url: env_var("GAVEL_VIDEO_TOKEN_URL")?,
            accounts: Vec::new(),
        },
        calendar: ServiceConfig {
            base_url: env_var("GAVEL_CALENDAR_BASE_URL")?,
            token_url: env_var("GAVEL_CALENDAR_TOKEN_URL")?,
            accounts: Vec::new(),
        },
        registry: RegistryConfig { base_url: env_var("GAVEL_REGISTRY_BASE_URL")? },
    })
}

/// Load configuration from a TOML file.
///
/// Probes the default locations when `path` is `None`.
///
/// # Errors
/// Returns `GavelError::Config` when no file is found or it fails to parse.
pub fn load_from_file(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => probe_config_paths()
            .ok_or_else(|| GavelError::Config("no configuration file found".into()))?,
    };

    let raw = std::fs::read_to_string(&path).map_err(|e| {
        GavelError::Config(format!("failed to read {}: {e}", path.display()))
    })?;
    let config: Config = toml::from_str(&raw).map_err(|e| {
        GavelError::Config(format!("failed to parse {}: {e}", path.display()))
    })?;

    tracing::info!(path = %path.display(), "configuration loaded from file");
    Ok(config)
}

fn probe_config_paths() -> Option<PathBuf> {
    ["gavel.toml", "config.toml", "../gavel.toml"]
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
}

fn env_var(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| GavelError::Config(format!("{name} not set")))
}
