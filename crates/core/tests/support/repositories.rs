//! In-memory meeting repository with sparse-update semantics.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use gavel_core::sync::ports::MeetingRepository;
use gavel_domain::{GavelError, Meeting, MeetingChangeSet, MeetingFilter, Result as DomainResult};

/// In-memory mock for `MeetingRepository`.
///
/// Applies change sets exactly like the SQLite implementation (only present
/// fields are written) and records every change set so tests can assert
/// which columns a reconciliation touched.
#[derive(Default)]
pub struct InMemoryMeetingRepository {
    rows: Mutex<HashMap<i64, Meeting>>,
    next_id: Mutex<i64>,
    updates: Mutex<Vec<MeetingChangeSet>>,
}

impl InMemoryMeetingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_meeting(self, meeting: Meeting) -> Self {
        {
            let mut next = self.next_id.lock().unwrap();
            *next = (*next).max(meeting.id);
            self.rows.lock().unwrap().insert(meeting.id, meeting);
        }
        self
    }

    /// Every change set passed to `update`, in call order.
    pub fn recorded_updates(&self) -> Vec<MeetingChangeSet> {
        self.updates.lock().unwrap().clone()
    }
}

fn apply_change_set(meeting: &mut Meeting, changes: &MeetingChangeSet) {
    if let Some(v) = changes.organization_id {
        meeting.organization_id = v;
    }
    if let Some(v) = changes.start {
        meeting.start = v;
    }
    if let Some(v) = changes.end {
        meeting.end = v;
    }
    if let Some(v) = &changes.timezone {
        meeting.timezone = v.clone();
    }
    if let Some(v) = &changes.summary {
        meeting.summary = v.clone();
    }
    if let Some(v) = &changes.location {
        meeting.location = v.clone();
    }
    if let Some(v) = changes.is_cancelled {
        meeting.is_cancelled = v;
    }
    if let Some(v) = changes.has_motions {
        meeting.has_motions = v;
    }
    if let Some(v) = changes.session_id {
        meeting.session_id = v;
    }
    if let Some(v) = changes.room_id {
        meeting.room_id = v;
    }
    if let Some(v) = &changes.video_link {
        meeting.video_link = v.clone();
    }
    if let Some(v) = &changes.calendar_link {
        meeting.calendar_link = v.clone();
    }
    if let Some(v) = &changes.registry_link {
        meeting.registry_link = v.clone();
    }
}

#[async_trait]
impl MeetingRepository for InMemoryMeetingRepository {
    async fn get(&self, id: i64) -> DomainResult<Meeting> {
        self.rows
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| GavelError::NotFound(format!("meeting {id}")))
    }

    async fn find(&self, filter: &MeetingFilter) -> DomainResult<Vec<Meeting>> {
        let rows = self.rows.lock().unwrap();
        let mut found: Vec<Meeting> = rows
            .values()
            .filter(|m| filter.ids.as_ref().map_or(true, |ids| ids.contains(&m.id)))
            .filter(|m| filter.organization_id.map_or(true, |org| m.organization_id == org))
            .filter(|m| filter.session_id.map_or(true, |s| m.session_id == Some(s)))
            .filter(|m| filter.from.map_or(true, |from| m.start >= from))
            .filter(|m| filter.to.map_or(true, |to| m.start <= to))
            .cloned()
            .collect();
        found.sort_by_key(|m| m.start);
        Ok(found)
    }

    async fn insert(&self, meeting: &Meeting) -> DomainResult<i64> {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        let id = *next;
        let mut stored = meeting.clone();
        stored.id = id;
        self.rows.lock().unwrap().insert(id, stored);
        Ok(id)
    }

    async fn update(&self, id: i64, changes: &MeetingChangeSet) -> DomainResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let meeting =
            rows.get_mut(&id).ok_or_else(|| GavelError::NotFound(format!("meeting {id}")))?;
        apply_change_set(meeting, changes);
        self.updates.lock().unwrap().push(changes.clone());
        Ok(())
    }

    async fn delete(&self, ids: &[i64]) -> DomainResult<usize> {
        let mut rows = self.rows.lock().unwrap();
        Ok(ids.iter().filter(|id| rows.remove(id).is_some()).count())
    }
}
