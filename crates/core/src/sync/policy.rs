//! Per-backend failure policy
//!
//! Whether a backend failure aborts the surrounding meeting operation is
//! data, not scattered exception handling: one table, consulted by the
//! reconciler's single attempt wrapper.

use std::fmt;

/// The three external resource kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Video,
    Calendar,
    Registry,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Video => write!(f, "video"),
            Self::Calendar => write!(f, "calendar"),
            Self::Registry => write!(f, "registry"),
        }
    }
}

/// Meeting-level operation being reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOp {
    Add,
    Update,
    Delete,
}

impl fmt::Display for SyncOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "add"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// What a backend failure does to the surrounding operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    /// Propagate; the meeting operation fails.
    Fatal,
    /// Log and continue with the link unchanged.
    WarnAndContinue,
}

/// The policy table.
///
/// Calendar sync is cosmetic, never authoritative, so calendar failures are
/// always swallowed. A registry breakout the caller just asked to create
/// must fail loudly (nothing exists to fall back on), while a resync of an
/// existing one must not take the whole update down. External cleanup never
/// blocks local deletion.
pub fn failure_mode(kind: ResourceKind, op: SyncOp) -> FailureMode {
    match (kind, op) {
        (ResourceKind::Calendar, _) => FailureMode::WarnAndContinue,
        (ResourceKind::Registry, SyncOp::Add) => FailureMode::Fatal,
        (ResourceKind::Registry, _) => FailureMode::WarnAndContinue,
        (ResourceKind::Video, SyncOp::Delete) => FailureMode::WarnAndContinue,
        (ResourceKind::Video, _) => FailureMode::Fatal,
    }
}
