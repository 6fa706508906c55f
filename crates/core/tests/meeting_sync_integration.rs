//! Reconciler behaviour tests
//!
//! Exercises the meeting reconciler end-to-end against in-memory ports:
//! provisioning, adoption, drift cleanup, no-op detection, replay
//! convergence, and the per-backend failure policy.

#![allow(dead_code)]

mod support;

use std::sync::Arc;

use gavel_core::MeetingSyncService;
use gavel_domain::{
    CalendarChange, Credit, GavelError, MeetingChanges, MeetingCreate, RegistryChange, RegistryRef,
    VideoChange, VideoConference, VideoRef,
};
use support::{
    meeting, organization, session, user, InMemoryMeetingRepository, MockCalendarClient,
    MockOrganizationProvider, MockRegistryClient, MockSessionProvider, MockVideoClient,
};

struct Harness {
    service: MeetingSyncService,
    repo: Arc<InMemoryMeetingRepository>,
    video: Arc<MockVideoClient>,
    calendar: Arc<MockCalendarClient>,
    registry: Arc<MockRegistryClient>,
}

fn harness(
    repo: InMemoryMeetingRepository,
    video: MockVideoClient,
    calendar: MockCalendarClient,
    registry: MockRegistryClient,
) -> Harness {
    let repo = Arc::new(repo);
    let video = Arc::new(video);
    let calendar = Arc::new(calendar);
    let registry = Arc::new(registry);
    let service = MeetingSyncService::new(
        repo.clone(),
        video.clone(),
        calendar.clone(),
        registry.clone(),
        Arc::new(MockSessionProvider::new(vec![session()])),
        Arc::new(MockOrganizationProvider::new(vec![organization()])),
    );
    Harness { service, repo, video, calendar, registry }
}

fn create_request() -> MeetingCreate {
    let m = meeting();
    MeetingCreate {
        organization_id: m.organization_id,
        start: m.start,
        end: m.end,
        timezone: m.timezone,
        summary: m.summary,
        location: None,
        is_cancelled: false,
        has_motions: false,
        session_id: m.session_id,
        room_id: None,
        video: VideoChange::Unchanged,
        calendar: CalendarChange::Unchanged,
        registry: RegistryChange::Unchanged,
    }
}

fn stored_conference(id: &str) -> VideoConference {
    VideoConference {
        id: id.into(),
        title: "Old title".into(),
        agenda: Some("Old agenda".into()),
        start: "2026-03-09T13:00:00Z".parse().unwrap(),
        end: "2026-03-09T15:00:00Z".parse().unwrap(),
        timezone: "America/New_York".into(),
        web_link: format!("https://video.example.com/j/{id}"),
        sip_address: None,
        dial_in_number: Some("+1-555-0100".into()),
        password: Some("hunter2".into()),
        host_key: None,
        enabled_auto_record: true,
        enabled_join_before_host: false,
        join_before_host_minutes: None,
    }
}

#[tokio::test]
async fn provisioning_twice_creates_two_distinct_conferences() {
    let h = harness(
        InMemoryMeetingRepository::new(),
        MockVideoClient::new(),
        MockCalendarClient::new(),
        MockRegistryClient::new(),
    );

    let mut request = create_request();
    request.video = VideoChange::ProvisionNew(7);
    let first = h.service.add(&user(), request.clone()).await.unwrap();
    let second = h.service.add(&user(), request).await.unwrap();

    let first_id = first.video.unwrap().id;
    let second_id = second.video.unwrap().id;
    assert_ne!(first_id, second_id, "ProvisionNew is not idempotent by design");
    assert_eq!(h.video.calls().add, 2);
}

#[tokio::test]
async fn unlink_succeeds_when_resource_is_already_gone() {
    // Linked conference that no longer exists on the provider side.
    let mut m = meeting();
    m.video_link = Some(VideoRef { account_id: 7, conference_id: "ghost".into() });
    let h = harness(
        InMemoryMeetingRepository::new().with_meeting(m),
        MockVideoClient::new(),
        MockCalendarClient::new(),
        MockRegistryClient::new(),
    );

    let changes = MeetingChanges { video: VideoChange::Unlink, ..MeetingChanges::default() };
    let outcome = h.service.update(&user(), 1, changes).await.unwrap();

    assert_eq!(outcome.meeting.video_link, None);
    assert_eq!(h.video.calls().delete, 1);
    assert_eq!(h.video.calls().add, 0);
}

#[tokio::test]
async fn adopting_the_linked_conference_updates_in_place_with_merge() {
    let link = VideoRef { account_id: 7, conference_id: "conf-7".into() };
    let mut m = meeting();
    m.video_link = Some(link.clone());
    let h = harness(
        InMemoryMeetingRepository::new().with_meeting(m),
        MockVideoClient::new().with_conference(stored_conference("conf-7")),
        MockCalendarClient::new(),
        MockRegistryClient::new(),
    );

    let changes = MeetingChanges {
        summary: Some("Closing plenary".into()),
        video: VideoChange::Adopt(link.clone()),
        ..MeetingChanges::default()
    };
    let outcome = h.service.update(&user(), 1, changes).await.unwrap();

    let calls = h.video.calls();
    assert_eq!(calls.update, 1, "exactly one in-place update");
    assert_eq!(calls.add, 0);
    assert_eq!(calls.delete, 0);

    // Local change applied, untouched provider fields preserved.
    let conference = h.video.conference("conf-7").unwrap();
    assert_eq!(conference.title, "Closing plenary");
    assert_eq!(conference.password.as_deref(), Some("hunter2"));
    assert!(conference.enabled_auto_record);
    assert_eq!(outcome.meeting.video_link, Some(link));
}

#[tokio::test]
async fn update_without_external_changes_touches_no_client() {
    let link = VideoRef { account_id: 7, conference_id: "conf-7".into() };
    let mut m = meeting();
    m.video_link = Some(link);
    let h = harness(
        InMemoryMeetingRepository::new().with_meeting(m),
        MockVideoClient::new().with_conference(stored_conference("conf-7")),
        MockCalendarClient::new(),
        MockRegistryClient::new(),
    );

    let changes = MeetingChanges { has_motions: Some(true), ..MeetingChanges::default() };
    let outcome = h.service.update(&user(), 1, changes).await.unwrap();

    assert!(outcome.meeting.has_motions);
    assert_eq!(h.video.calls().total(), 0);
    assert_eq!(h.calendar.calls().total(), 0);
    assert_eq!(h.registry.calls().total(), 0);

    // Only the one scalar column was persisted.
    let updates = h.repo.recorded_updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].has_motions, Some(true));
    assert_eq!(updates[0].summary, None);
    assert_eq!(updates[0].video_link, None);
}

#[tokio::test]
async fn replaying_an_adopt_request_converges() {
    let target = VideoRef { account_id: 7, conference_id: "conf-9".into() };
    let h = harness(
        InMemoryMeetingRepository::new().with_meeting(meeting()),
        MockVideoClient::new().with_conference(stored_conference("conf-9")),
        MockCalendarClient::new(),
        MockRegistryClient::new(),
    );

    let changes = MeetingChanges { video: VideoChange::Adopt(target.clone()), ..MeetingChanges::default() };
    let first = h.service.update(&user(), 1, changes.clone()).await.unwrap();
    assert_eq!(first.meeting.video_link, Some(target.clone()));

    let second = h.service.update(&user(), 1, changes).await.unwrap();
    assert_eq!(second.meeting.video_link, Some(target));

    let calls = h.video.calls();
    assert_eq!(calls.add, 0, "no duplicate provisioning on replay");
    assert_eq!(calls.delete, 0);
    assert_eq!(calls.update, 2, "each run refreshes in place");
}

#[tokio::test]
async fn calendar_failure_does_not_fail_the_update() {
    let h = harness(
        InMemoryMeetingRepository::new().with_meeting(meeting()),
        MockVideoClient::new(),
        MockCalendarClient::new().failing_with(GavelError::Network("calendar down".into())),
        MockRegistryClient::new(),
    );

    let changes = MeetingChanges {
        summary: Some("Joint session".into()),
        video: VideoChange::ProvisionNew(7),
        calendar: CalendarChange::ProvisionNew(3),
        ..MeetingChanges::default()
    };
    let outcome = h.service.update(&user(), 1, changes).await.unwrap();

    assert!(outcome.meeting.video_link.is_some(), "video link still provisioned");
    assert_eq!(outcome.meeting.calendar_link, None, "calendar link left unchanged");
    assert_eq!(outcome.meeting.summary, "Joint session");
    assert_eq!(h.calendar.calls().add, 1, "the attempt was made");
}

#[tokio::test]
async fn registry_create_failure_propagates_during_add() {
    let h = harness(
        InMemoryMeetingRepository::new(),
        MockVideoClient::new(),
        MockCalendarClient::new(),
        MockRegistryClient::new().failing_add_with(GavelError::Network("registry down".into())),
    );

    let mut request = create_request();
    request.registry = RegistryChange::ProvisionNew(200);
    let err = h.service.add(&user(), request).await.unwrap_err();
    assert!(matches!(err, GavelError::Network(_)));
}

#[tokio::test]
async fn registry_failure_is_swallowed_during_update() {
    let link = RegistryRef { registry_meeting_id: 200, breakout_id: 31 };
    let mut m = meeting();
    m.registry_link = Some(link.clone());
    let breakout = gavel_domain::Breakout {
        id: 31,
        registry_meeting_id: 200,
        name: "TGax opening".into(),
        location: "Grand Ballroom".into(),
        description: None,
        day: 1,
        start_slot_id: 1,
        end_slot_id: 1,
        credit: Credit::Normal,
        facilitator: None,
    };
    let h = harness(
        InMemoryMeetingRepository::new().with_meeting(m),
        MockVideoClient::new(),
        MockCalendarClient::new(),
        MockRegistryClient::new()
            .with_breakout(breakout)
            .failing_update_with(GavelError::Network("registry down".into())),
    );

    let changes =
        MeetingChanges { summary: Some("Renamed".into()), ..MeetingChanges::default() };
    let outcome = h.service.update(&user(), 1, changes).await.unwrap();

    assert_eq!(outcome.meeting.summary, "Renamed");
    assert_eq!(outcome.meeting.registry_link, Some(link), "link survives the failed resync");
}

#[tokio::test]
async fn provisioning_video_and_calendar_sets_exactly_two_columns() {
    let h = harness(
        InMemoryMeetingRepository::new().with_meeting(meeting()),
        MockVideoClient::new(),
        MockCalendarClient::new(),
        MockRegistryClient::new(),
    );

    let changes = MeetingChanges {
        video: VideoChange::ProvisionNew(7),
        calendar: CalendarChange::ProvisionNew(3),
        ..MeetingChanges::default()
    };
    let outcome = h.service.update(&user(), 1, changes).await.unwrap();

    assert!(outcome.meeting.video_link.is_some());
    assert!(outcome.meeting.calendar_link.is_some());
    assert_eq!(outcome.meeting.registry_link, None);
    assert_eq!(h.video.calls().add, 1);
    assert_eq!(h.calendar.calls().add, 1);
    assert_eq!(h.registry.calls().total(), 0);

    let updates = h.repo.recorded_updates();
    assert_eq!(updates.len(), 1, "one persisted row update");
    let set = &updates[0];
    assert!(set.video_link.is_some());
    assert!(set.calendar_link.is_some());
    assert_eq!(set.registry_link, None);
    assert_eq!(set.summary, None, "no scalar column touched");
}

#[tokio::test]
async fn vanished_conference_clears_the_link_on_update() {
    let mut m = meeting();
    m.video_link = Some(VideoRef { account_id: 7, conference_id: "ghost".into() });
    let h = harness(
        InMemoryMeetingRepository::new().with_meeting(m),
        MockVideoClient::new(),
        MockCalendarClient::new(),
        MockRegistryClient::new(),
    );

    let changes =
        MeetingChanges { summary: Some("Renamed".into()), ..MeetingChanges::default() };
    let outcome = h.service.update(&user(), 1, changes).await.unwrap();

    assert_eq!(outcome.meeting.video_link, None, "drift observed, link cleared");
    assert_eq!(outcome.meeting.summary, "Renamed");
    assert_eq!(h.video.calls().get, 1);
    assert_eq!(h.video.calls().update, 0);
}

#[tokio::test]
async fn cancelling_a_meeting_forces_registry_markers() {
    let link = RegistryRef { registry_meeting_id: 200, breakout_id: 31 };
    let mut m = meeting();
    m.registry_link = Some(link);
    let breakout = gavel_domain::Breakout {
        id: 31,
        registry_meeting_id: 200,
        name: "TGax opening".into(),
        location: "Grand Ballroom".into(),
        description: None,
        day: 1,
        start_slot_id: 1,
        end_slot_id: 1,
        credit: Credit::Normal,
        facilitator: None,
    };
    let h = harness(
        InMemoryMeetingRepository::new().with_meeting(m),
        MockVideoClient::new(),
        MockCalendarClient::new(),
        MockRegistryClient::new().with_breakout(breakout),
    );

    let changes = MeetingChanges { is_cancelled: Some(true), ..MeetingChanges::default() };
    h.service.update(&user(), 1, changes).await.unwrap();

    let breakout = h.registry.breakout(200, 31).unwrap();
    assert_eq!(breakout.location, "CANCELLED");
    assert_eq!(breakout.credit, Credit::Zero);
    assert!(breakout.name.starts_with("CANCELLED - "));
}

#[tokio::test]
async fn add_threads_video_into_registry_and_calendar() {
    let h = harness(
        InMemoryMeetingRepository::new(),
        MockVideoClient::new(),
        MockCalendarClient::new(),
        MockRegistryClient::new(),
    );

    let mut request = create_request();
    request.video = VideoChange::ProvisionNew(7);
    request.calendar = CalendarChange::ProvisionNew(3);
    request.registry = RegistryChange::ProvisionNew(200);
    let outcome = h.service.add(&user(), request).await.unwrap();

    let video = outcome.video.unwrap();
    let breakout = outcome.breakout.unwrap();
    assert!(breakout.description.unwrap().contains(&video.web_link));
    assert_eq!(breakout.credit, Credit::Normal, "grid default for day 1 / AM1");

    let meeting = &outcome.meeting;
    assert!(meeting.video_link.is_some());
    assert!(meeting.registry_link.is_some());
    let calendar_link = meeting.calendar_link.clone().unwrap();
    let event = h.calendar.event(&calendar_link.event_id).unwrap();
    assert!(event.summary.starts_with("Wireless WG: "), "organization prefix on the title");
    assert!(event.description.unwrap().contains(&video.web_link));
}

#[tokio::test]
async fn delete_cleans_up_external_resources_best_effort() {
    let mut first = meeting();
    first.id = 1;
    first.video_link = Some(VideoRef { account_id: 7, conference_id: "conf-7".into() });
    let mut second = meeting();
    second.id = 2;
    // Breakout already gone on the registry side.
    second.registry_link = Some(RegistryRef { registry_meeting_id: 200, breakout_id: 99 });

    let h = harness(
        InMemoryMeetingRepository::new().with_meeting(first).with_meeting(second),
        MockVideoClient::new().with_conference(stored_conference("conf-7")),
        MockCalendarClient::new(),
        MockRegistryClient::new(),
    );

    let deleted = h.service.delete(&user(), &[1, 2, 57]).await.unwrap();
    assert_eq!(deleted, 2, "missing id 57 does not count");
    assert_eq!(h.video.conference("conf-7"), None);
    assert!(h.repo.recorded_updates().is_empty());
}
