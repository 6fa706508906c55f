//! External-resource parameter synthesis
//!
//! Pure builders turning the target meeting state plus already-settled step
//! outputs (video handle, session context, organization) into the parameter
//! sets pushed to each external system. Ordering between resource kinds
//! lives in the service; everything here is side-effect free.

use chrono::Timelike;
use gavel_domain::constants::{CANCELLED_LOCATION, CANCELLED_PREFIX};
use gavel_domain::{
    Breakout, BreakoutParams, CalendarEventParams, Credit, EventStatus, GavelError, Meeting,
    Organization, Result, Session, VideoConference, VideoConferenceParams,
};

/// Video parameters derived from the target meeting.
pub fn video_params(target: &Meeting) -> VideoConferenceParams {
    VideoConferenceParams {
        title: Some(target.summary.clone()),
        start: Some(target.start),
        end: Some(target.end),
        timezone: Some(target.timezone.clone()),
        ..VideoConferenceParams::default()
    }
}

/// Human-readable join details for a provisioned conference.
///
/// Embedded in breakout and calendar descriptions so attendees can join
/// without opening the video system.
pub fn conference_details(video: &VideoConference) -> String {
    let mut lines = vec![format!("Join: {}", video.web_link)];
    if let Some(dial_in) = &video.dial_in_number {
        lines.push(format!("Dial-in: {dial_in}"));
    }
    if let Some(sip) = &video.sip_address {
        lines.push(format!("SIP: {sip}"));
    }
    if let Some(password) = &video.password {
        lines.push(format!("Password: {password}"));
    }
    lines.join("\n")
}

/// A meeting's position on the session slot grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotInterval {
    pub day: u32,
    pub start_slot_id: i64,
    pub end_slot_id: i64,
}

/// Map the meeting's wall-clock interval onto the session's slot grid.
///
/// The grid is interpreted in the session's timezone. The start slot is the
/// latest slot beginning at or before the meeting start (first slot when the
/// meeting starts before the grid opens); the end slot is the earliest slot
/// ending at or after the meeting end (last slot when it runs past the
/// grid).
pub fn slot_interval(session: &Session, target: &Meeting) -> Result<SlotInterval> {
    if session.timeslots.is_empty() {
        return Err(GavelError::Validation(format!("session {} has no timeslots", session.id)));
    }

    let tz = session.tz()?;
    let local_start = target.start.with_timezone(&tz);
    let local_end = target.end.with_timezone(&tz);

    let day = (local_start.date_naive() - session.start_date).num_days();
    let span = (session.end_date - session.start_date).num_days();
    if day < 0 || day > span {
        return Err(GavelError::Validation(format!(
            "meeting {} does not fall within session {} ({} .. {})",
            target.id, session.id, session.start_date, session.end_date
        )));
    }

    let mut slots = session.timeslots.clone();
    slots.sort_by_key(|s| s.start);

    let start_time = local_start.time().with_nanosecond(0).unwrap_or_else(|| local_start.time());
    let end_time = local_end.time().with_nanosecond(0).unwrap_or_else(|| local_end.time());

    let start_slot = slots
        .iter()
        .rev()
        .find(|s| s.start <= start_time)
        .or_else(|| slots.first())
        .map(|s| s.id)
        .unwrap_or_default();
    let end_slot = slots
        .iter()
        .find(|s| s.end >= end_time)
        .or_else(|| slots.last())
        .map(|s| s.id)
        .unwrap_or_default();

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let day = day as u32;
    Ok(SlotInterval { day, start_slot_id: start_slot, end_slot_id: end_slot })
}

/// Breakout parameters derived from the target meeting and session context.
///
/// Location precedence: explicit meeting location, then the session room
/// matched by `room_id`, then the video web link. Credit precedence: the
/// grid default for the start slot, overridden by an existing breakout's
/// stored credit so manual registry-side overrides survive resync.
/// Cancellation overrides everything: fixed location marker, zero credit,
/// name prefix.
pub fn breakout_params(
    target: &Meeting,
    session: &Session,
    video: Option<&VideoConference>,
    existing: Option<&Breakout>,
) -> Result<BreakoutParams> {
    let interval = slot_interval(session, target)?;

    let location = if target.is_cancelled {
        CANCELLED_LOCATION.to_string()
    } else {
        target
            .location
            .clone()
            .or_else(|| target.room_id.and_then(|id| session.room_name(id)).map(String::from))
            .or_else(|| video.map(|v| v.web_link.clone()))
            .unwrap_or_default()
    };

    let credit = if target.is_cancelled {
        Credit::Zero
    } else {
        existing
            .map(|b| b.credit)
            .or_else(|| session.default_credit(interval.day, interval.start_slot_id))
            .unwrap_or(Credit::Zero)
    };

    let name = if target.is_cancelled {
        format!("{CANCELLED_PREFIX}{}", target.summary)
    } else {
        target.summary.clone()
    };

    Ok(BreakoutParams {
        name,
        location,
        description: video.map(conference_details),
        day: interval.day,
        start_slot_id: interval.start_slot_id,
        end_slot_id: interval.end_slot_id,
        credit,
        facilitator: existing.and_then(|b| b.facilitator.clone()),
    })
}

/// Calendar event parameters derived from everything settled before the
/// calendar step: the target meeting, the owning organization, the video
/// handle, and the registry outcome.
///
/// Status is always `Confirmed`: the provider soft-deletes, so an update of
/// a lingering cancelled event must reassert the event as active.
pub fn calendar_params(
    target: &Meeting,
    org: &Organization,
    video: Option<&VideoConference>,
    breakout: Option<&Breakout>,
) -> CalendarEventParams {
    let mut description_parts = Vec::new();
    if let Some(v) = video {
        description_parts.push(conference_details(v));
    }
    if let Some(b) = breakout {
        description_parts
            .push(format!("Attendance credit: {} (breakout {})", b.credit.as_str(), b.id));
    }

    CalendarEventParams {
        status: EventStatus::Confirmed,
        summary: format!("{}: {}", org.display_name, target.summary),
        description: if description_parts.is_empty() {
            None
        } else {
            Some(description_parts.join("\n"))
        },
        location: target
            .location
            .clone()
            .or_else(|| video.map(|v| v.web_link.clone())),
        start: target.start,
        end: target.end,
        timezone: target.timezone.clone(),
    }
}
