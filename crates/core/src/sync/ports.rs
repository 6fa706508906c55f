//! Port interfaces for meeting synchronization
//!
//! These traits define the boundaries between core reconciliation logic and
//! infrastructure implementations. Every client signals an absent external
//! resource with `GavelError::NotFound`, distinct from other failures; the
//! reconciler relies on that distinction for drift cleanup and best-effort
//! deletes.

use async_trait::async_trait;
use gavel_domain::{
    Breakout, BreakoutParams, CalendarEvent, CalendarEventParams, Meeting, MeetingChangeSet,
    MeetingFilter, Organization, Result, Session, UserContext, VideoConference,
    VideoConferenceParams,
};

/// Client for the video-conference system, scoped by account id.
#[async_trait]
pub trait VideoClient: Send + Sync {
    /// Provision a new conference under the given account.
    async fn add(&self, account_id: i64, params: &VideoConferenceParams)
        -> Result<VideoConference>;

    /// Update an existing conference.
    async fn update(
        &self,
        account_id: i64,
        conference_id: &str,
        params: &VideoConferenceParams,
    ) -> Result<VideoConference>;

    /// Fetch a conference's current state.
    async fn get(&self, account_id: i64, conference_id: &str) -> Result<VideoConference>;

    /// Delete a conference.
    async fn delete(&self, account_id: i64, conference_id: &str) -> Result<()>;
}

/// Client for the calendar system, scoped by account id.
#[async_trait]
pub trait CalendarClient: Send + Sync {
    /// Create a new event under the given account's calendar.
    async fn add(&self, account_id: i64, params: &CalendarEventParams) -> Result<CalendarEvent>;

    /// Update an existing event.
    async fn update(
        &self,
        account_id: i64,
        event_id: &str,
        params: &CalendarEventParams,
    ) -> Result<CalendarEvent>;

    /// Delete an event.
    async fn delete(&self, account_id: i64, event_id: &str) -> Result<()>;
}

/// Client for the attendance-registry system.
///
/// Authenticates with the calling user's registry session; every operation
/// fails with `GavelError::Auth` when the user has none.
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// Create a breakout under a registry meeting.
    async fn add(
        &self,
        user: &UserContext,
        registry_meeting_id: i64,
        params: &BreakoutParams,
    ) -> Result<Breakout>;

    /// Update an existing breakout.
    async fn update(
        &self,
        user: &UserContext,
        registry_meeting_id: i64,
        breakout_id: i64,
        params: &BreakoutParams,
    ) -> Result<Breakout>;

    /// Fetch a breakout's current state.
    async fn get(
        &self,
        user: &UserContext,
        registry_meeting_id: i64,
        breakout_id: i64,
    ) -> Result<Breakout>;

    /// Delete breakouts, returning how many the registry removed.
    async fn delete(
        &self,
        user: &UserContext,
        registry_meeting_id: i64,
        breakout_ids: &[i64],
    ) -> Result<usize>;
}

/// Read-only session context (rooms, slot grid, credit defaults).
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Fetch a session by id.
    async fn get(&self, session_id: i64) -> Result<Session>;
}

/// Read-only organization lookup.
#[async_trait]
pub trait OrganizationProvider: Send + Sync {
    /// Fetch an organization by id.
    async fn get(&self, organization_id: i64) -> Result<Organization>;
}

/// Persistence of the canonical meeting row.
#[async_trait]
pub trait MeetingRepository: Send + Sync {
    /// Load a meeting, `NotFound` if absent.
    async fn get(&self, id: i64) -> Result<Meeting>;

    /// Query meetings by filter, returning timezone-correct instants.
    async fn find(&self, filter: &MeetingFilter) -> Result<Vec<Meeting>>;

    /// Insert a new meeting row (the `id` on `meeting` is ignored) and
    /// return the assigned id.
    async fn insert(&self, meeting: &Meeting) -> Result<i64>;

    /// Apply a sparse update: only columns present in the change set are
    /// written.
    async fn update(&self, id: i64, changes: &MeetingChangeSet) -> Result<()>;

    /// Delete meetings by id, returning how many rows were removed.
    async fn delete(&self, ids: &[i64]) -> Result<usize>;
}
