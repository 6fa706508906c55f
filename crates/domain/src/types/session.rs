//! Session, room, and timeslot collaborator data
//!
//! Read-only context for the registry resource kind: a session describes a
//! multi-day event with a fixed grid of timeslots per day and per-slot
//! default attendance credits. This core never mutates session data.

use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::errors::{GavelError, Result};
use crate::types::registry::Credit;

/// A room available during a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: i64,
    pub name: String,
}

/// One slot of the session's daily grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeslot {
    pub id: i64,
    pub name: String,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// Default credit for one (day, slot) cell of the session grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotCredit {
    pub day: u32,
    pub slot_id: i64,
    pub credit: Credit,
}

/// Multi-day event a meeting may belong to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: i64,
    pub name: String,
    /// Registry meeting this session corresponds to, when registered
    pub registry_meeting_id: Option<i64>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub timezone: String,
    pub rooms: Vec<Room>,
    pub timeslots: Vec<Timeslot>,
    pub default_credits: Vec<SlotCredit>,
}

impl Session {
    /// Parse the session's IANA timezone name.
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse()
            .map_err(|_| GavelError::Validation(format!("invalid timezone: {}", self.timezone)))
    }

    /// Room name lookup by id.
    pub fn room_name(&self, room_id: i64) -> Option<&str> {
        self.rooms.iter().find(|r| r.id == room_id).map(|r| r.name.as_str())
    }

    /// Default credit for a (day, slot) cell, when the grid defines one.
    pub fn default_credit(&self, day: u32, slot_id: i64) -> Option<Credit> {
        self.default_credits
            .iter()
            .find(|c| c.day == day && c.slot_id == slot_id)
            .map(|c| c.credit)
    }
}
