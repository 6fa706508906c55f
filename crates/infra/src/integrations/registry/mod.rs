//! Attendance-registry integration
//!
//! The registration system has no JSON API: breakouts are read back through
//! its CSV export and written through form posts, authenticated with the
//! calling user's own registry session. This adapter wraps that surface
//! behind the typed `RegistryClient` port; nothing outside this module
//! knows the registry speaks CSV.

mod client;
mod export;

pub use client::HttpRegistryClient;
