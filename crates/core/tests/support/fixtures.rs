//! Meeting, session, and user fixtures shared across reconciler tests.

use chrono::{NaiveDate, NaiveTime};
use gavel_domain::{
    Credit, Meeting, Organization, Room, Session, SlotCredit, Timeslot, UserContext,
};

/// 13:00–15:00 UTC meeting on day 1 of [`session`], unlinked everywhere.
pub fn meeting() -> Meeting {
    Meeting {
        id: 1,
        organization_id: 10,
        start: "2026-03-09T13:00:00Z".parse().unwrap(),
        end: "2026-03-09T15:00:00Z".parse().unwrap(),
        timezone: "America/New_York".into(),
        summary: "TGax opening".into(),
        location: None,
        is_cancelled: false,
        has_motions: false,
        session_id: Some(5),
        room_id: None,
        video_link: None,
        calendar_link: None,
        registry_link: None,
    }
}

/// Six-day session with a three-slot daily grid in New York time.
pub fn session() -> Session {
    Session {
        id: 5,
        name: "March plenary".into(),
        registry_meeting_id: Some(200),
        start_date: NaiveDate::from_ymd_opt(2026, 3, 8).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2026, 3, 13).unwrap(),
        timezone: "America/New_York".into(),
        rooms: vec![
            Room { id: 1, name: "Grand Ballroom".into() },
            Room { id: 2, name: "Salon C".into() },
        ],
        timeslots: vec![
            Timeslot {
                id: 1,
                name: "AM1".into(),
                start: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
                end: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            },
            Timeslot {
                id: 2,
                name: "AM2".into(),
                start: NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
                end: NaiveTime::from_hms_opt(12, 30, 0).unwrap(),
            },
            Timeslot {
                id: 3,
                name: "PM1".into(),
                start: NaiveTime::from_hms_opt(13, 30, 0).unwrap(),
                end: NaiveTime::from_hms_opt(15, 30, 0).unwrap(),
            },
        ],
        default_credits: vec![
            SlotCredit { day: 1, slot_id: 1, credit: Credit::Normal },
            SlotCredit { day: 1, slot_id: 2, credit: Credit::Extra },
        ],
    }
}

pub fn organization() -> Organization {
    Organization { id: 10, name: "wg-wireless".into(), display_name: "Wireless WG".into() }
}

pub fn user() -> UserContext {
    UserContext { user_id: 42, name: "chair".into(), registry_token: Some("tok-42".into()) }
}
