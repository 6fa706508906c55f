//! Calendar API wire types
//!
//! The provider nests start/end as `{dateTime, timeZone}` pairs and carries
//! event status as a lowercase string; both are normalized into domain
//! shapes here.

use chrono::{DateTime, Utc};
use gavel_domain::{CalendarEvent, CalendarEventParams, EventStatus, GavelError};
use serde::{Deserialize, Serialize};

/// Nested time value on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    pub date_time: DateTime<Utc>,
    pub time_zone: String,
}

/// Event resource as returned by the provider.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResource {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    pub start: EventTime,
    pub end: EventTime,
}

impl TryFrom<EventResource> for CalendarEvent {
    type Error = GavelError;

    fn try_from(raw: EventResource) -> Result<Self, Self::Error> {
        let status = match raw.status.as_str() {
            "confirmed" => EventStatus::Confirmed,
            "tentative" => EventStatus::Tentative,
            "cancelled" => EventStatus::Cancelled,
            other => {
                return Err(GavelError::Network(format!("unknown event status: {other}")));
            }
        };
        Ok(Self {
            id: raw.id,
            status,
            summary: raw.summary.unwrap_or_default(),
            description: raw.description,
            location: raw.location,
            start: raw.start.date_time,
            end: raw.end.date_time,
            timezone: raw.start.time_zone,
        })
    }
}

/// Event create/update request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest<'a> {
    pub status: &'a str,
    pub summary: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<&'a str>,
    pub start: EventTime,
    pub end: EventTime,
}

impl<'a> From<&'a CalendarEventParams> for EventRequest<'a> {
    fn from(params: &'a CalendarEventParams) -> Self {
        let status = match params.status {
            EventStatus::Confirmed => "confirmed",
            EventStatus::Tentative => "tentative",
            EventStatus::Cancelled => "cancelled",
        };
        Self {
            status,
            summary: &params.summary,
            description: params.description.as_deref(),
            location: params.location.as_deref(),
            start: EventTime { date_time: params.start, time_zone: params.timezone.clone() },
            end: EventTime { date_time: params.end, time_zone: params.timezone.clone() },
        }
    }
}
