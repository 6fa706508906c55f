//! SQLite-backed implementation of the SessionProvider port.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use gavel_core::sync::ports::SessionProvider;
use gavel_domain::{Credit, GavelError, Result, Room, Session, SlotCredit, Timeslot};
use tracing::instrument;

use super::manager::DbManager;
use crate::errors::InfraError;

/// SQLite implementation of the session read.
pub struct SqliteSessionProvider {
    db: Arc<DbManager>,
}

impl SqliteSessionProvider {
    /// Create a new provider over the shared database manager.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    s.parse().map_err(|_| GavelError::Database(format!("invalid date: {s}")))
}

fn parse_time(s: &str) -> Result<NaiveTime> {
    s.parse().map_err(|_| GavelError::Database(format!("invalid time: {s}")))
}

fn parse_credit(s: &str) -> Result<Credit> {
    Credit::parse(s).ok_or_else(|| GavelError::Database(format!("invalid credit: {s}")))
}

#[async_trait]
impl SessionProvider for SqliteSessionProvider {
    #[instrument(skip(self))]
    async fn get(&self, session_id: i64) -> Result<Session> {
        let conn = self.db.conn()?;

        let (name, registry_meeting_id, start_date, end_date, timezone) = conn
            .query_row(
                "SELECT name, registry_meeting_id, start_date, end_date, timezone
                 FROM sessions WHERE id = ?",
                [session_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, Option<i64>>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                    ))
                },
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    GavelError::NotFound(format!("session {session_id}"))
                }
                other => InfraError::from(other).into(),
            })?;

        let mut stmt = conn
            .prepare("SELECT id, name FROM rooms WHERE session_id = ? ORDER BY id")
            .map_err(InfraError::from)?;
        let rooms = stmt
            .query_map([session_id], |row| {
                Ok(Room { id: row.get(0)?, name: row.get(1)? })
            })
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;

        let mut stmt = conn
            .prepare(
                "SELECT id, name, start_time, end_time FROM timeslots
                 WHERE session_id = ? ORDER BY start_time",
            )
            .map_err(InfraError::from)?;
        let raw_slots = stmt
            .query_map([session_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;
        let timeslots = raw_slots
            .into_iter()
            .map(|(id, name, start, end)| {
                Ok(Timeslot { id, name, start: parse_time(&start)?, end: parse_time(&end)? })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut stmt = conn
            .prepare(
                "SELECT day, slot_id, credit FROM session_credits
                 WHERE session_id = ? ORDER BY day, slot_id",
            )
            .map_err(InfraError::from)?;
        let raw_credits = stmt
            .query_map([session_id], |row| {
                Ok((row.get::<_, u32>(0)?, row.get::<_, i64>(1)?, row.get::<_, String>(2)?))
            })
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;
        let default_credits = raw_credits
            .into_iter()
            .map(|(day, slot_id, credit)| {
                Ok(SlotCredit { day, slot_id, credit: parse_credit(&credit)? })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Session {
            id: session_id,
            name,
            registry_meeting_id,
            start_date: parse_date(&start_date)?,
            end_date: parse_date(&end_date)?,
            timezone,
            rooms,
            timeslots,
            default_credits,
        })
    }
}
