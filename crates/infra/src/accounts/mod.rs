//! Per-account authorized HTTP clients
//!
//! The only shared mutable state in the system: a read-mostly registry of
//! API clients keyed by account id, populated at startup and on auth
//! completion, read by every reconciliation. Each client holds one
//! credential pair and performs exactly one transparent refresh-and-retry
//! when a request comes back 401; concurrent refreshes are writer-wins.

mod client;
mod registry;

pub use client::AuthorizedClient;
pub use registry::AccountClientRegistry;
