//! Video API wire types
//!
//! Raw request/response shapes for the conference REST API, kept separate
//! from the domain types so provider quirks stay on this side of the
//! boundary.

use chrono::{DateTime, Utc};
use gavel_domain::{VideoConference, VideoConferenceParams};
use serde::{Deserialize, Serialize};

/// Conference resource as returned by the provider.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConferenceResource {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub agenda: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub timezone: String,
    pub web_link: String,
    #[serde(default)]
    pub sip_address: Option<String>,
    #[serde(default)]
    pub dial_in_number: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub host_key: Option<String>,
    #[serde(default)]
    pub enabled_auto_record: bool,
    #[serde(default)]
    pub enabled_join_before_host: bool,
    #[serde(default)]
    pub join_before_host_minutes: Option<u32>,
}

impl From<ConferenceResource> for VideoConference {
    fn from(raw: ConferenceResource) -> Self {
        Self {
            id: raw.id,
            title: raw.title,
            agenda: raw.agenda,
            start: raw.start,
            end: raw.end,
            timezone: raw.timezone,
            web_link: raw.web_link,
            sip_address: raw.sip_address,
            dial_in_number: raw.dial_in_number,
            password: raw.password,
            host_key: raw.host_key,
            enabled_auto_record: raw.enabled_auto_record,
            enabled_join_before_host: raw.enabled_join_before_host,
            join_before_host_minutes: raw.join_before_host_minutes,
        }
    }
}

/// Conference create/update request body.
///
/// Absent fields are omitted from the payload so the provider keeps its
/// current values.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConferenceRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agenda: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled_auto_record: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled_join_before_host: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join_before_host_minutes: Option<u32>,
}

impl<'a> From<&'a VideoConferenceParams> for ConferenceRequest<'a> {
    fn from(params: &'a VideoConferenceParams) -> Self {
        Self {
            title: params.title.as_deref(),
            agenda: params.agenda.as_deref(),
            start: params.start,
            end: params.end,
            timezone: params.timezone.as_deref(),
            password: params.password.as_deref(),
            enabled_auto_record: params.enabled_auto_record,
            enabled_join_before_host: params.enabled_join_before_host,
            join_before_host_minutes: params.join_before_host_minutes,
        }
    }
}
