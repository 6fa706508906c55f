//! Video-conference resource shapes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Video conference as reported by the provider.
///
/// Never cached or treated as authoritative; fetched fresh when needed and
/// discarded after the reconciliation that used it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoConference {
    pub id: String,
    pub title: String,
    pub agenda: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub timezone: String,
    /// Join URL shown to attendees and embedded in descriptions
    pub web_link: String,
    pub sip_address: Option<String>,
    pub dial_in_number: Option<String>,
    pub password: Option<String>,
    pub host_key: Option<String>,
    pub enabled_auto_record: bool,
    pub enabled_join_before_host: bool,
    pub join_before_host_minutes: Option<u32>,
}

/// Writable subset of a video conference.
///
/// Every field is optional so an update can carry exactly the fields the
/// caller touched; [`VideoConferenceParams::merge_onto`] fills the gaps from
/// the provider's current state when adopting an existing conference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoConferenceParams {
    pub title: Option<String>,
    pub agenda: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub timezone: Option<String>,
    pub password: Option<String>,
    pub enabled_auto_record: Option<bool>,
    pub enabled_join_before_host: Option<bool>,
    pub join_before_host_minutes: Option<u32>,
}

impl VideoConferenceParams {
    /// Deep-merge these params on top of an existing conference.
    ///
    /// Fields the caller did not touch keep the provider's current value, so
    /// adopting a conference never blindly resets settings configured out of
    /// band.
    pub fn merge_onto(&self, existing: &VideoConference) -> Self {
        Self {
            title: self.title.clone().or_else(|| Some(existing.title.clone())),
            agenda: self.agenda.clone().or_else(|| existing.agenda.clone()),
            start: self.start.or(Some(existing.start)),
            end: self.end.or(Some(existing.end)),
            timezone: self.timezone.clone().or_else(|| Some(existing.timezone.clone())),
            password: self.password.clone().or_else(|| existing.password.clone()),
            enabled_auto_record: self.enabled_auto_record.or(Some(existing.enabled_auto_record)),
            enabled_join_before_host: self
                .enabled_join_before_host
                .or(Some(existing.enabled_join_before_host)),
            join_before_host_minutes: self
                .join_before_host_minutes
                .or(existing.join_before_host_minutes),
        }
    }
}
