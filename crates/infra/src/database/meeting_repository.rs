//! SQLite-backed implementation of the MeetingRepository port.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gavel_core::sync::ports::MeetingRepository;
use gavel_domain::{
    CalendarRef, GavelError, Meeting, MeetingChangeSet, MeetingFilter, RegistryRef, Result,
    VideoRef,
};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Row};
use tracing::{debug, instrument};

use super::manager::DbManager;
use crate::errors::InfraError;

const MEETING_COLUMNS: &str = "id, organization_id, start_ts, end_ts, timezone, summary, \
     location, is_cancelled, has_motions, session_id, room_id, \
     video_account_id, video_conference_id, calendar_account_id, calendar_event_id, \
     registry_meeting_id, registry_breakout_id";

/// SQLite implementation of the meeting store.
pub struct SqliteMeetingRepository {
    db: Arc<DbManager>,
}

impl SqliteMeetingRepository {
    /// Create a new repository over the shared database manager.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<(Meeting, i64, i64)> {
    let video_account: Option<i64> = row.get(11)?;
    let video_conference: Option<String> = row.get(12)?;
    let calendar_account: Option<i64> = row.get(13)?;
    let calendar_event: Option<String> = row.get(14)?;
    let registry_meeting: Option<i64> = row.get(15)?;
    let registry_breakout: Option<i64> = row.get(16)?;

    let meeting = Meeting {
        id: row.get(0)?,
        organization_id: row.get(1)?,
        start: DateTime::<Utc>::MIN_UTC, // set from the raw timestamps below
        end: DateTime::<Utc>::MIN_UTC,
        timezone: row.get(4)?,
        summary: row.get(5)?,
        location: row.get(6)?,
        is_cancelled: row.get(7)?,
        has_motions: row.get(8)?,
        session_id: row.get(9)?,
        room_id: row.get(10)?,
        // A half-set pair means a torn write; read it as unlinked.
        video_link: match (video_account, video_conference) {
            (Some(account_id), Some(conference_id)) => {
                Some(VideoRef { account_id, conference_id })
            }
            _ => None,
        },
        calendar_link: match (calendar_account, calendar_event) {
            (Some(account_id), Some(event_id)) => Some(CalendarRef { account_id, event_id }),
            _ => None,
        },
        registry_link: match (registry_meeting, registry_breakout) {
            (Some(registry_meeting_id), Some(breakout_id)) => {
                Some(RegistryRef { registry_meeting_id, breakout_id })
            }
            _ => None,
        },
    };
    Ok((meeting, row.get(2)?, row.get(3)?))
}

fn finish_row((mut meeting, start_ts, end_ts): (Meeting, i64, i64)) -> Result<Meeting> {
    meeting.start = DateTime::from_timestamp(start_ts, 0)
        .ok_or_else(|| GavelError::Database(format!("invalid start timestamp {start_ts}")))?;
    meeting.end = DateTime::from_timestamp(end_ts, 0)
        .ok_or_else(|| GavelError::Database(format!("invalid end timestamp {end_ts}")))?;
    Ok(meeting)
}

fn text_or_null(value: &Option<String>) -> Value {
    match value {
        Some(v) => Value::Text(v.clone()),
        None => Value::Null,
    }
}

fn int_or_null(value: Option<i64>) -> Value {
    match value {
        Some(v) => Value::Integer(v),
        None => Value::Null,
    }
}

/// Accumulates `SET` fragments and their values for a sparse UPDATE.
#[derive(Default)]
struct UpdateBuilder {
    sets: Vec<&'static str>,
    values: Vec<Value>,
}

impl UpdateBuilder {
    fn push(&mut self, fragment: &'static str, value: Value) {
        self.sets.push(fragment);
        self.values.push(value);
    }

    fn from_change_set(changes: &MeetingChangeSet) -> Self {
        let mut b = Self::default();
        if let Some(v) = changes.organization_id {
            b.push("organization_id = ?", Value::Integer(v));
        }
        if let Some(v) = changes.start {
            b.push("start_ts = ?", Value::Integer(v.timestamp()));
        }
        if let Some(v) = changes.end {
            b.push("end_ts = ?", Value::Integer(v.timestamp()));
        }
        if let Some(v) = &changes.timezone {
            b.push("timezone = ?", Value::Text(v.clone()));
        }
        if let Some(v) = &changes.summary {
            b.push("summary = ?", Value::Text(v.clone()));
        }
        if let Some(v) = &changes.location {
            b.push("location = ?", text_or_null(v));
        }
        if let Some(v) = changes.is_cancelled {
            b.push("is_cancelled = ?", Value::Integer(v.into()));
        }
        if let Some(v) = changes.has_motions {
            b.push("has_motions = ?", Value::Integer(v.into()));
        }
        if let Some(v) = changes.session_id {
            b.push("session_id = ?", int_or_null(v));
        }
        if let Some(v) = changes.room_id {
            b.push("room_id = ?", int_or_null(v));
        }
        // Link pairs always travel together so a partial link can never be
        // persisted.
        if let Some(v) = &changes.video_link {
            b.push("video_account_id = ?", int_or_null(v.as_ref().map(|r| r.account_id)));
            b.push(
                "video_conference_id = ?",
                text_or_null(&v.as_ref().map(|r| r.conference_id.clone())),
            );
        }
        if let Some(v) = &changes.calendar_link {
            b.push("calendar_account_id = ?", int_or_null(v.as_ref().map(|r| r.account_id)));
            b.push(
                "calendar_event_id = ?",
                text_or_null(&v.as_ref().map(|r| r.event_id.clone())),
            );
        }
        if let Some(v) = &changes.registry_link {
            b.push(
                "registry_meeting_id = ?",
                int_or_null(v.as_ref().map(|r| r.registry_meeting_id)),
            );
            b.push(
                "registry_breakout_id = ?",
                int_or_null(v.as_ref().map(|r| r.breakout_id)),
            );
        }
        b
    }
}

#[async_trait]
impl MeetingRepository for SqliteMeetingRepository {
    #[instrument(skip(self))]
    async fn get(&self, id: i64) -> Result<Meeting> {
        let conn = self.db.conn()?;
        let sql = format!("SELECT {MEETING_COLUMNS} FROM meetings WHERE id = ?");
        let raw = conn
            .query_row(&sql, [id], map_row)
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    GavelError::NotFound(format!("meeting {id}"))
                }
                other => InfraError::from(other).into(),
            })?;
        finish_row(raw)
    }

    #[instrument(skip(self, filter))]
    async fn find(&self, filter: &MeetingFilter) -> Result<Vec<Meeting>> {
        let conn = self.db.conn()?;
        let mut clauses: Vec<String> = Vec::new();
        let mut values: Vec<Value> = Vec::new();

        if let Some(ids) = &filter.ids {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            let placeholders = vec!["?"; ids.len()].join(", ");
            clauses.push(format!("id IN ({placeholders})"));
            values.extend(ids.iter().map(|id| Value::Integer(*id)));
        }
        if let Some(org) = filter.organization_id {
            clauses.push("organization_id = ?".into());
            values.push(Value::Integer(org));
        }
        if let Some(session) = filter.session_id {
            clauses.push("session_id = ?".into());
            values.push(Value::Integer(session));
        }
        if let Some(from) = filter.from {
            clauses.push("start_ts >= ?".into());
            values.push(Value::Integer(from.timestamp()));
        }
        if let Some(to) = filter.to {
            clauses.push("start_ts <= ?".into());
            values.push(Value::Integer(to.timestamp()));
        }

        let mut sql = format!("SELECT {MEETING_COLUMNS} FROM meetings");
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY start_ts ASC");

        let mut stmt = conn.prepare(&sql).map_err(InfraError::from)?;
        let rows = stmt
            .query_map(params_from_iter(values), map_row)
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;

        debug!(count = rows.len(), "meetings fetched");
        rows.into_iter().map(finish_row).collect()
    }

    #[instrument(skip(self, meeting))]
    async fn insert(&self, meeting: &Meeting) -> Result<i64> {
        let conn = self.db.conn()?;
        let now = Utc::now().timestamp();
        conn.execute(
            "INSERT INTO meetings (
                organization_id, start_ts, end_ts, timezone, summary, location,
                is_cancelled, has_motions, session_id, room_id,
                video_account_id, video_conference_id,
                calendar_account_id, calendar_event_id,
                registry_meeting_id, registry_breakout_id,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
            rusqlite::params![
                meeting.organization_id,
                meeting.start.timestamp(),
                meeting.end.timestamp(),
                meeting.timezone,
                meeting.summary,
                meeting.location,
                meeting.is_cancelled,
                meeting.has_motions,
                meeting.session_id,
                meeting.room_id,
                meeting.video_link.as_ref().map(|r| r.account_id),
                meeting.video_link.as_ref().map(|r| r.conference_id.clone()),
                meeting.calendar_link.as_ref().map(|r| r.account_id),
                meeting.calendar_link.as_ref().map(|r| r.event_id.clone()),
                meeting.registry_link.as_ref().map(|r| r.registry_meeting_id),
                meeting.registry_link.as_ref().map(|r| r.breakout_id),
                now,
                now,
            ],
        )
        .map_err(InfraError::from)?;
        let id = conn.last_insert_rowid();
        debug!(meeting_id = id, "meeting inserted");
        Ok(id)
    }

    #[instrument(skip(self, changes))]
    async fn update(&self, id: i64, changes: &MeetingChangeSet) -> Result<()> {
        if changes.is_empty() {
            return Ok(());
        }
        let conn = self.db.conn()?;
        let mut builder = UpdateBuilder::from_change_set(changes);
        builder.push("updated_at = ?", Value::Integer(Utc::now().timestamp()));

        let sql =
            format!("UPDATE meetings SET {} WHERE id = ?", builder.sets.join(", "));
        let mut values = builder.values;
        values.push(Value::Integer(id));

        let affected =
            conn.execute(&sql, params_from_iter(values)).map_err(InfraError::from)?;
        if affected == 0 {
            return Err(GavelError::NotFound(format!("meeting {id}")));
        }
        debug!(meeting_id = id, columns = builder.sets.len(), "meeting updated");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, ids: &[i64]) -> Result<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        let conn = self.db.conn()?;
        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!("DELETE FROM meetings WHERE id IN ({placeholders})");
        let values = ids.iter().map(|id| Value::Integer(*id));
        let affected =
            conn.execute(&sql, params_from_iter(values)).map_err(InfraError::from)?;
        debug!(requested = ids.len(), deleted = affected, "meetings deleted");
        Ok(affected)
    }
}
