//! # Gavel Core
//!
//! Business logic of the meeting synchronization core.
//!
//! This crate contains:
//! - Port traits for the external collaborators (video, calendar, registry,
//!   session/organization reads, meeting store)
//! - The link resolver: the pure decision table shared by all three
//!   resource kinds
//! - The per-backend failure policy table
//! - The meeting reconciler service
//! - The batch orchestrator
//!
//! ## Architecture
//! - Depends only on `gavel-domain`
//! - No I/O: everything impure arrives through the port traits

pub mod batch;
pub mod sync;

// Re-export commonly used items
pub use batch::MeetingBatchService;
pub use sync::resolver::{resolve_link, LinkAction};
pub use sync::service::{MeetingSyncService, SyncOutcome};
