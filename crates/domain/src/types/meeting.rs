//! Canonical meeting entity and its change shapes

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::errors::{GavelError, Result};
use crate::types::change::{CalendarChange, RegistryChange, VideoChange};

/// Link to a provisioned video conference.
///
/// Both halves are persisted together or not at all; a partial link is never
/// written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRef {
    pub account_id: i64,
    pub conference_id: String,
}

/// Link to a provisioned calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarRef {
    pub account_id: i64,
    pub event_id: String,
}

/// Link to an attendance-registry breakout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryRef {
    pub registry_meeting_id: i64,
    pub breakout_id: i64,
}

/// Canonical meeting record.
///
/// The single source of truth this core reconciles external resources
/// against. External resources are handles, never authorities: when one
/// disappears out-of-band the corresponding link here is cleared on the next
/// reconciliation that observes the drift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub id: i64,
    pub organization_id: i64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// IANA timezone name the wall-clock interval is interpreted in
    pub timezone: String,
    pub summary: String,
    pub location: Option<String>,
    pub is_cancelled: bool,
    pub has_motions: bool,
    /// Optional multi-day event this meeting belongs to
    pub session_id: Option<i64>,
    /// Room within the session, used for registry location defaulting
    pub room_id: Option<i64>,
    pub video_link: Option<VideoRef>,
    pub calendar_link: Option<CalendarRef>,
    pub registry_link: Option<RegistryRef>,
}

impl Meeting {
    /// Parse the stored IANA timezone name.
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse()
            .map_err(|_| GavelError::Validation(format!("invalid timezone: {}", self.timezone)))
    }

    /// Start instant rendered in the meeting's own timezone.
    pub fn local_start(&self) -> Result<DateTime<Tz>> {
        Ok(self.start.with_timezone(&self.tz()?))
    }

    /// End instant rendered in the meeting's own timezone.
    pub fn local_end(&self) -> Result<DateTime<Tz>> {
        Ok(self.end.with_timezone(&self.tz()?))
    }
}

/// Input for creating a meeting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingCreate {
    pub organization_id: i64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub timezone: String,
    pub summary: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub is_cancelled: bool,
    #[serde(default)]
    pub has_motions: bool,
    #[serde(default)]
    pub session_id: Option<i64>,
    #[serde(default)]
    pub room_id: Option<i64>,
    #[serde(default)]
    pub video: VideoChange,
    #[serde(default)]
    pub calendar: CalendarChange,
    #[serde(default)]
    pub registry: RegistryChange,
}

/// Requested changes to a meeting: sparse scalar fields plus one link change
/// request per external resource kind.
///
/// `Option<Option<_>>` fields distinguish "leave unchanged" (outer `None`)
/// from "clear" (`Some(None)`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MeetingChanges {
    pub organization_id: Option<i64>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub timezone: Option<String>,
    pub summary: Option<String>,
    pub location: Option<Option<String>>,
    pub is_cancelled: Option<bool>,
    pub has_motions: Option<bool>,
    pub session_id: Option<Option<i64>>,
    pub room_id: Option<Option<i64>>,
    pub video: VideoChange,
    pub calendar: CalendarChange,
    pub registry: RegistryChange,
}

impl MeetingChanges {
    /// Whether any scalar field that feeds external-resource parameters
    /// (titles, descriptions, times, locations, cancellation state) is
    /// being changed.
    ///
    /// Drives no-op detection: an update with all links `Unchanged` and no
    /// dirty parameters must not touch any external client. `has_motions`
    /// is a local bookkeeping flag no external system sees, so it does not
    /// count.
    pub fn params_dirty(&self) -> bool {
        self.organization_id.is_some()
            || self.start.is_some()
            || self.end.is_some()
            || self.timezone.is_some()
            || self.summary.is_some()
            || self.location.is_some()
            || self.is_cancelled.is_some()
            || self.session_id.is_some()
            || self.room_id.is_some()
    }

    /// Apply the scalar changes on top of `current`, producing the target
    /// state reconciliation drives toward. Link fields are untouched; links
    /// are settled by the reconciler itself.
    pub fn apply_to(&self, current: &Meeting) -> Meeting {
        let mut target = current.clone();
        if let Some(v) = self.organization_id {
            target.organization_id = v;
        }
        if let Some(v) = self.start {
            target.start = v;
        }
        if let Some(v) = self.end {
            target.end = v;
        }
        if let Some(v) = &self.timezone {
            target.timezone = v.clone();
        }
        if let Some(v) = &self.summary {
            target.summary = v.clone();
        }
        if let Some(v) = &self.location {
            target.location = v.clone();
        }
        if let Some(v) = self.is_cancelled {
            target.is_cancelled = v;
        }
        if let Some(v) = self.has_motions {
            target.has_motions = v;
        }
        if let Some(v) = self.session_id {
            target.session_id = v;
        }
        if let Some(v) = self.room_id {
            target.room_id = v;
        }
        target
    }

    /// Copy the scalar changes into a store-facing change set.
    pub fn to_change_set(&self) -> MeetingChangeSet {
        MeetingChangeSet {
            organization_id: self.organization_id,
            start: self.start,
            end: self.end,
            timezone: self.timezone.clone(),
            summary: self.summary.clone(),
            location: self.location.clone(),
            is_cancelled: self.is_cancelled,
            has_motions: self.has_motions,
            session_id: self.session_id,
            room_id: self.room_id,
            ..MeetingChangeSet::default()
        }
    }
}

/// One element of a batch update request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingUpdate {
    pub id: i64,
    pub changes: MeetingChanges,
}

/// Sparse column set persisted after reconciliation.
///
/// Only present fields are written; the store never overwrites an
/// unspecified column. Link columns use the same two-level `Option` so a
/// link can be set (`Some(Some(_))`) or cleared (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeetingChangeSet {
    pub organization_id: Option<i64>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub timezone: Option<String>,
    pub summary: Option<String>,
    pub location: Option<Option<String>>,
    pub is_cancelled: Option<bool>,
    pub has_motions: Option<bool>,
    pub session_id: Option<Option<i64>>,
    pub room_id: Option<Option<i64>>,
    pub video_link: Option<Option<VideoRef>>,
    pub calendar_link: Option<Option<CalendarRef>>,
    pub registry_link: Option<Option<RegistryRef>>,
}

impl MeetingChangeSet {
    /// True when no column would be written.
    pub fn is_empty(&self) -> bool {
        self.organization_id.is_none()
            && self.start.is_none()
            && self.end.is_none()
            && self.timezone.is_none()
            && self.summary.is_none()
            && self.location.is_none()
            && self.is_cancelled.is_none()
            && self.has_motions.is_none()
            && self.session_id.is_none()
            && self.room_id.is_none()
            && self.video_link.is_none()
            && self.calendar_link.is_none()
            && self.registry_link.is_none()
    }
}

/// Query constraints for reading meetings from the store.
#[derive(Debug, Clone, Default)]
pub struct MeetingFilter {
    pub ids: Option<Vec<i64>>,
    pub organization_id: Option<i64>,
    pub session_id: Option<i64>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}
