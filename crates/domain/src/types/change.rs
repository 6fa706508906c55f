//! Link change requests
//!
//! A meeting update carries one change request per external resource kind.
//! The four cases are modelled as an explicit tagged union instead of the
//! nullable-plus-sentinel convention the wire layer uses, so "field omitted"
//! and "field explicitly null" can never be confused.

use serde::{Deserialize, Serialize};

use crate::types::meeting::{CalendarRef, RegistryRef, VideoRef};

/// Requested change to one external-resource link.
///
/// `O` is the owning scope a brand-new resource is provisioned under (an
/// account id for video/calendar, a registry meeting id for breakouts); `R`
/// is the full link ref for adopting an already-existing resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "target", rename_all = "camelCase")]
pub enum LinkChange<O, R> {
    /// Leave the link as it is (absent field on the wire).
    Unchanged,
    /// Unlink, best-effort deleting the external resource (explicit null).
    Unlink,
    /// Provision a brand-new external resource under the given owner.
    ProvisionNew(O),
    /// Adopt an already-existing external resource, refreshing its
    /// parameters from the meeting.
    Adopt(R),
}

// Manual impl: the derive would demand `O: Default` and `R: Default`, and
// link refs deliberately have no default value.
impl<O, R> Default for LinkChange<O, R> {
    fn default() -> Self {
        Self::Unchanged
    }
}

impl<O, R> LinkChange<O, R> {
    /// True for the `Unchanged` case.
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }
}

/// Change request for the video-conference link.
pub type VideoChange = LinkChange<i64, VideoRef>;

/// Change request for the calendar-event link.
pub type CalendarChange = LinkChange<i64, CalendarRef>;

/// Change request for the registry-breakout link.
pub type RegistryChange = LinkChange<i64, RegistryRef>;
