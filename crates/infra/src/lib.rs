//! # Gavel Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - SQLite repositories (meeting store, session and organization reads)
//! - The per-account authorized HTTP client registry with transparent
//!   token refresh
//! - External service adapters (video conferencing, calendar, attendance
//!   registry)
//! - The configuration loader
//!
//! ## Architecture
//! - Implements traits defined in `gavel-core`
//! - Depends on `gavel-domain` and `gavel-core`
//! - Contains all "impure" code (I/O, HTTP, SQL)

pub mod accounts;
pub mod config;
pub mod database;
pub mod errors;
pub mod integrations;

// Re-export commonly used items
pub use accounts::{AccountClientRegistry, AuthorizedClient};
pub use database::{
    DbManager, SqliteMeetingRepository, SqliteOrganizationProvider, SqliteSessionProvider,
};
pub use errors::InfraError;
pub use integrations::calendar::HttpCalendarClient;
pub use integrations::registry::HttpRegistryClient;
pub use integrations::video::HttpVideoClient;
