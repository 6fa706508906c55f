//! Attendance-registry resource shapes

use serde::{Deserialize, Serialize};

/// Attendance credit recorded for a breakout.
///
/// The registry's fixed vocabulary; `Zero` is the forced value for cancelled
/// meetings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Credit {
    Normal,
    Extra,
    Zero,
    Other,
}

impl Credit {
    /// Registry wire spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Extra => "Extra",
            Self::Zero => "Zero",
            Self::Other => "Other",
        }
    }

    /// Parse the registry wire spelling.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "Normal" => Some(Self::Normal),
            "Extra" => Some(Self::Extra),
            "Zero" => Some(Self::Zero),
            "Other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Breakout record held by the registration system.
///
/// Slots and day index are positions on the owning session's fixed grid,
/// not wall-clock instants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakout {
    pub id: i64,
    pub registry_meeting_id: i64,
    pub name: String,
    pub location: String,
    pub description: Option<String>,
    /// Day index within the session (0 = session start date)
    pub day: u32,
    pub start_slot_id: i64,
    pub end_slot_id: i64,
    pub credit: Credit,
    pub facilitator: Option<String>,
}

/// Writable fields of a breakout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakoutParams {
    pub name: String,
    pub location: String,
    pub description: Option<String>,
    pub day: u32,
    pub start_slot_id: i64,
    pub end_slot_id: i64,
    pub credit: Credit,
    pub facilitator: Option<String>,
}
