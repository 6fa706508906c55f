//! In-memory mocks for the external-resource client ports.
//!
//! Each mock stores resources in a map, counts calls per operation, and can
//! be armed to fail specific operations, so tests can assert both outcomes
//! and exact call patterns.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use gavel_core::sync::ports::{
    CalendarClient, OrganizationProvider, RegistryClient, SessionProvider, VideoClient,
};
use gavel_domain::{
    Breakout, BreakoutParams, CalendarEvent, CalendarEventParams, GavelError, Organization,
    Result as DomainResult, Session, UserContext, VideoConference, VideoConferenceParams,
};

/// Per-operation call counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub add: usize,
    pub update: usize,
    pub get: usize,
    pub delete: usize,
}

impl CallCounts {
    pub fn total(&self) -> usize {
        self.add + self.update + self.get + self.delete
    }
}

/* ---------------------------------------------------------------------- */
/* Video                                                                  */
/* ---------------------------------------------------------------------- */

#[derive(Default)]
pub struct MockVideoClient {
    conferences: Mutex<HashMap<String, VideoConference>>,
    calls: Mutex<CallCounts>,
    next_id: Mutex<u32>,
}

impl MockVideoClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_conference(self, conference: VideoConference) -> Self {
        self.conferences.lock().unwrap().insert(conference.id.clone(), conference);
        self
    }

    pub fn calls(&self) -> CallCounts {
        *self.calls.lock().unwrap()
    }

    pub fn conference(&self, id: &str) -> Option<VideoConference> {
        self.conferences.lock().unwrap().get(id).cloned()
    }

    fn materialize(&self, id: String, params: &VideoConferenceParams) -> VideoConference {
        let mut conference = VideoConference {
            web_link: format!("https://video.example.com/j/{id}"),
            id,
            title: String::new(),
            agenda: None,
            start: chrono::Utc::now(),
            end: chrono::Utc::now(),
            timezone: "UTC".into(),
            sip_address: None,
            dial_in_number: None,
            password: None,
            host_key: None,
            enabled_auto_record: false,
            enabled_join_before_host: false,
            join_before_host_minutes: None,
        };
        apply_video_params(&mut conference, params);
        conference
    }
}

fn apply_video_params(conference: &mut VideoConference, params: &VideoConferenceParams) {
    if let Some(v) = &params.title {
        conference.title = v.clone();
    }
    if let Some(v) = &params.agenda {
        conference.agenda = Some(v.clone());
    }
    if let Some(v) = params.start {
        conference.start = v;
    }
    if let Some(v) = params.end {
        conference.end = v;
    }
    if let Some(v) = &params.timezone {
        conference.timezone = v.clone();
    }
    if let Some(v) = &params.password {
        conference.password = Some(v.clone());
    }
    if let Some(v) = params.enabled_auto_record {
        conference.enabled_auto_record = v;
    }
    if let Some(v) = params.enabled_join_before_host {
        conference.enabled_join_before_host = v;
    }
    if let Some(v) = params.join_before_host_minutes {
        conference.join_before_host_minutes = Some(v);
    }
}

#[async_trait]
impl VideoClient for MockVideoClient {
    async fn add(
        &self,
        _account_id: i64,
        params: &VideoConferenceParams,
    ) -> DomainResult<VideoConference> {
        self.calls.lock().unwrap().add += 1;
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        let conference = self.materialize(format!("conf-{}", *next), params);
        self.conferences.lock().unwrap().insert(conference.id.clone(), conference.clone());
        Ok(conference)
    }

    async fn update(
        &self,
        _account_id: i64,
        conference_id: &str,
        params: &VideoConferenceParams,
    ) -> DomainResult<VideoConference> {
        self.calls.lock().unwrap().update += 1;
        let mut conferences = self.conferences.lock().unwrap();
        let conference = conferences
            .get_mut(conference_id)
            .ok_or_else(|| GavelError::NotFound(format!("conference {conference_id}")))?;
        apply_video_params(conference, params);
        Ok(conference.clone())
    }

    async fn get(&self, _account_id: i64, conference_id: &str) -> DomainResult<VideoConference> {
        self.calls.lock().unwrap().get += 1;
        self.conferences
            .lock()
            .unwrap()
            .get(conference_id)
            .cloned()
            .ok_or_else(|| GavelError::NotFound(format!("conference {conference_id}")))
    }

    async fn delete(&self, _account_id: i64, conference_id: &str) -> DomainResult<()> {
        self.calls.lock().unwrap().delete += 1;
        self.conferences
            .lock()
            .unwrap()
            .remove(conference_id)
            .map(|_| ())
            .ok_or_else(|| GavelError::NotFound(format!("conference {conference_id}")))
    }
}

/* ---------------------------------------------------------------------- */
/* Calendar                                                               */
/* ---------------------------------------------------------------------- */

#[derive(Default)]
pub struct MockCalendarClient {
    events: Mutex<HashMap<String, CalendarEvent>>,
    calls: Mutex<CallCounts>,
    next_id: Mutex<u32>,
    fail_all: Mutex<Option<GavelError>>,
}

impl MockCalendarClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm every operation to fail with the given error.
    pub fn failing_with(self, error: GavelError) -> Self {
        *self.fail_all.lock().unwrap() = Some(error);
        self
    }

    pub fn with_event(self, event: CalendarEvent) -> Self {
        self.events.lock().unwrap().insert(event.id.clone(), event);
        self
    }

    pub fn calls(&self) -> CallCounts {
        *self.calls.lock().unwrap()
    }

    pub fn event(&self, id: &str) -> Option<CalendarEvent> {
        self.events.lock().unwrap().get(id).cloned()
    }

    fn check_armed(&self) -> DomainResult<()> {
        match &*self.fail_all.lock().unwrap() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CalendarClient for MockCalendarClient {
    async fn add(
        &self,
        _account_id: i64,
        params: &CalendarEventParams,
    ) -> DomainResult<CalendarEvent> {
        self.calls.lock().unwrap().add += 1;
        self.check_armed()?;
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        let event = CalendarEvent {
            id: format!("evt-{}", *next),
            status: params.status,
            summary: params.summary.clone(),
            description: params.description.clone(),
            location: params.location.clone(),
            start: params.start,
            end: params.end,
            timezone: params.timezone.clone(),
        };
        self.events.lock().unwrap().insert(event.id.clone(), event.clone());
        Ok(event)
    }

    async fn update(
        &self,
        _account_id: i64,
        event_id: &str,
        params: &CalendarEventParams,
    ) -> DomainResult<CalendarEvent> {
        self.calls.lock().unwrap().update += 1;
        self.check_armed()?;
        let mut events = self.events.lock().unwrap();
        let event = events
            .get_mut(event_id)
            .ok_or_else(|| GavelError::NotFound(format!("event {event_id}")))?;
        event.status = params.status;
        event.summary = params.summary.clone();
        event.description = params.description.clone();
        event.location = params.location.clone();
        event.start = params.start;
        event.end = params.end;
        event.timezone = params.timezone.clone();
        Ok(event.clone())
    }

    async fn delete(&self, _account_id: i64, event_id: &str) -> DomainResult<()> {
        self.calls.lock().unwrap().delete += 1;
        self.check_armed()?;
        self.events
            .lock()
            .unwrap()
            .remove(event_id)
            .map(|_| ())
            .ok_or_else(|| GavelError::NotFound(format!("event {event_id}")))
    }
}

/* ---------------------------------------------------------------------- */
/* Registry                                                               */
/* ---------------------------------------------------------------------- */

#[derive(Default)]
pub struct MockRegistryClient {
    breakouts: Mutex<HashMap<(i64, i64), Breakout>>,
    calls: Mutex<CallCounts>,
    next_id: Mutex<i64>,
    fail_add: Mutex<Option<GavelError>>,
    fail_update: Mutex<Option<GavelError>>,
}

impl MockRegistryClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_breakout(self, breakout: Breakout) -> Self {
        self.breakouts
            .lock()
            .unwrap()
            .insert((breakout.registry_meeting_id, breakout.id), breakout);
        self
    }

    pub fn failing_add_with(self, error: GavelError) -> Self {
        *self.fail_add.lock().unwrap() = Some(error);
        self
    }

    pub fn failing_update_with(self, error: GavelError) -> Self {
        *self.fail_update.lock().unwrap() = Some(error);
        self
    }

    pub fn calls(&self) -> CallCounts {
        *self.calls.lock().unwrap()
    }

    pub fn breakout(&self, registry_meeting_id: i64, breakout_id: i64) -> Option<Breakout> {
        self.breakouts.lock().unwrap().get(&(registry_meeting_id, breakout_id)).cloned()
    }

    fn authenticate(user: &UserContext) -> DomainResult<()> {
        user.registry_token().map(|_| ())
    }
}

#[async_trait]
impl RegistryClient for MockRegistryClient {
    async fn add(
        &self,
        user: &UserContext,
        registry_meeting_id: i64,
        params: &BreakoutParams,
    ) -> DomainResult<Breakout> {
        self.calls.lock().unwrap().add += 1;
        Self::authenticate(user)?;
        if let Some(err) = &*self.fail_add.lock().unwrap() {
            return Err(err.clone());
        }
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        let breakout = Breakout {
            id: *next,
            registry_meeting_id,
            name: params.name.clone(),
            location: params.location.clone(),
            description: params.description.clone(),
            day: params.day,
            start_slot_id: params.start_slot_id,
            end_slot_id: params.end_slot_id,
            credit: params.credit,
            facilitator: params.facilitator.clone(),
        };
        self.breakouts
            .lock()
            .unwrap()
            .insert((registry_meeting_id, breakout.id), breakout.clone());
        Ok(breakout)
    }

    async fn update(
        &self,
        user: &UserContext,
        registry_meeting_id: i64,
        breakout_id: i64,
        params: &BreakoutParams,
    ) -> DomainResult<Breakout> {
        self.calls.lock().unwrap().update += 1;
        Self::authenticate(user)?;
        if let Some(err) = &*self.fail_update.lock().unwrap() {
            return Err(err.clone());
        }
        let mut breakouts = self.breakouts.lock().unwrap();
        let breakout = breakouts
            .get_mut(&(registry_meeting_id, breakout_id))
            .ok_or_else(|| GavelError::NotFound(format!("breakout {breakout_id}")))?;
        breakout.name = params.name.clone();
        breakout.location = params.location.clone();
        breakout.description = params.description.clone();
        breakout.day = params.day;
        breakout.start_slot_id = params.start_slot_id;
        breakout.end_slot_id = params.end_slot_id;
        breakout.credit = params.credit;
        breakout.facilitator = params.facilitator.clone();
        Ok(breakout.clone())
    }

    async fn get(
        &self,
        user: &UserContext,
        registry_meeting_id: i64,
        breakout_id: i64,
    ) -> DomainResult<Breakout> {
        self.calls.lock().unwrap().get += 1;
        Self::authenticate(user)?;
        self.breakouts
            .lock()
            .unwrap()
            .get(&(registry_meeting_id, breakout_id))
            .cloned()
            .ok_or_else(|| GavelError::NotFound(format!("breakout {breakout_id}")))
    }

    async fn delete(
        &self,
        user: &UserContext,
        registry_meeting_id: i64,
        breakout_ids: &[i64],
    ) -> DomainResult<usize> {
        self.calls.lock().unwrap().delete += 1;
        Self::authenticate(user)?;
        let mut breakouts = self.breakouts.lock().unwrap();
        let mut removed = 0;
        for id in breakout_ids {
            if breakouts.remove(&(registry_meeting_id, *id)).is_some() {
                removed += 1;
            }
        }
        if removed == 0 {
            return Err(GavelError::NotFound(format!(
                "no breakouts {breakout_ids:?} under registry meeting {registry_meeting_id}"
            )));
        }
        Ok(removed)
    }
}

/* ---------------------------------------------------------------------- */
/* Session / organization reads                                           */
/* ---------------------------------------------------------------------- */

#[derive(Default)]
pub struct MockSessionProvider {
    sessions: Mutex<HashMap<i64, Session>>,
}

impl MockSessionProvider {
    pub fn new(sessions: Vec<Session>) -> Self {
        Self {
            sessions: Mutex::new(sessions.into_iter().map(|s| (s.id, s)).collect()),
        }
    }
}

#[async_trait]
impl SessionProvider for MockSessionProvider {
    async fn get(&self, session_id: i64) -> DomainResult<Session> {
        self.sessions
            .lock()
            .unwrap()
            .get(&session_id)
            .cloned()
            .ok_or_else(|| GavelError::NotFound(format!("session {session_id}")))
    }
}

#[derive(Default)]
pub struct MockOrganizationProvider {
    organizations: Mutex<HashMap<i64, Organization>>,
}

impl MockOrganizationProvider {
    pub fn new(organizations: Vec<Organization>) -> Self {
        Self {
            organizations: Mutex::new(organizations.into_iter().map(|o| (o.id, o)).collect()),
        }
    }
}

#[async_trait]
impl OrganizationProvider for MockOrganizationProvider {
    async fn get(&self, organization_id: i64) -> DomainResult<Organization> {
        self.organizations
            .lock()
            .unwrap()
            .get(&organization_id)
            .cloned()
            .ok_or_else(|| GavelError::NotFound(format!("organization {organization_id}")))
    }
}
