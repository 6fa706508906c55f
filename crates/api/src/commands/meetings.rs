//! Batch meeting commands
//!
//! The public surface of the synchronization core: every operation requires
//! an authenticated user (checked before anything touches the network) and
//! validates element shape up front, then hands the batch to the
//! orchestrator. Results come back as parallel arrays aligned with the
//! input, one outcome per element.

use std::time::Instant;

use chrono_tz::Tz;
use gavel_core::SyncOutcome;
use gavel_domain::{
    Breakout, GavelError, Meeting, MeetingCreate, MeetingFilter, MeetingUpdate, Result,
    UserContext, VideoConference,
};
use serde::Serialize;
use tracing::info;

use crate::context::AppContext;
use crate::utils::logging::log_command_execution;

/// Per-element outcomes of a batch operation, aligned with the input order.
///
/// `meetings[i]`/`videos[i]`/`breakouts[i]` are populated when element `i`
/// succeeded; `errors[i]` carries its failure otherwise. A failed element
/// never prevents its siblings from succeeding.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingsResponse {
    pub meetings: Vec<Option<Meeting>>,
    pub videos: Vec<Option<VideoConference>>,
    pub breakouts: Vec<Option<Breakout>>,
    pub errors: Vec<Option<GavelError>>,
}

impl MeetingsResponse {
    fn from_outcomes(outcomes: Vec<Result<SyncOutcome>>) -> Self {
        let mut response = Self::default();
        for outcome in outcomes {
            match outcome {
                Ok(o) => {
                    response.meetings.push(Some(o.meeting));
                    response.videos.push(o.video);
                    response.breakouts.push(o.breakout);
                    response.errors.push(None);
                }
                Err(e) => {
                    response.meetings.push(None);
                    response.videos.push(None);
                    response.breakouts.push(None);
                    response.errors.push(Some(e));
                }
            }
        }
        response
    }

    /// Whether every element succeeded.
    pub fn is_complete_success(&self) -> bool {
        self.errors.iter().all(Option::is_none)
    }
}

fn require_user(user: Option<&UserContext>) -> Result<&UserContext> {
    user.ok_or_else(|| GavelError::Auth("an authenticated user is required".into()))
}

fn validate_timezone(timezone: &str) -> Result<()> {
    timezone
        .parse::<Tz>()
        .map(|_| ())
        .map_err(|_| GavelError::Validation(format!("invalid timezone: {timezone}")))
}

fn validate_create(create: &MeetingCreate) -> Result<()> {
    if create.summary.trim().is_empty() {
        return Err(GavelError::Validation("meeting summary must not be empty".into()));
    }
    if create.end <= create.start {
        return Err(GavelError::Validation("meeting end must be after its start".into()));
    }
    validate_timezone(&create.timezone)
}

fn validate_update(update: &MeetingUpdate) -> Result<()> {
    if let Some(summary) = &update.changes.summary {
        if summary.trim().is_empty() {
            return Err(GavelError::Validation("meeting summary must not be empty".into()));
        }
    }
    if let (Some(start), Some(end)) = (update.changes.start, update.changes.end) {
        if end <= start {
            return Err(GavelError::Validation("meeting end must be after its start".into()));
        }
    }
    if let Some(timezone) = &update.changes.timezone {
        validate_timezone(timezone)?;
    }
    Ok(())
}

/// Create meetings and provision their external resources.
pub async fn add_meetings(
    ctx: &AppContext,
    user: Option<&UserContext>,
    creates: Vec<MeetingCreate>,
) -> Result<MeetingsResponse> {
    let user = require_user(user)?;
    for create in &creates {
        validate_create(create)?;
    }

    let started = Instant::now();
    info!(count = creates.len(), "adding meetings");
    let outcomes = ctx.batch.add_meetings(user, creates).await;
    let response = MeetingsResponse::from_outcomes(outcomes);
    log_command_execution("meetings::add", started.elapsed(), response.is_complete_success());
    Ok(response)
}

/// Reconcile requested changes against existing meetings.
pub async fn update_meetings(
    ctx: &AppContext,
    user: Option<&UserContext>,
    updates: Vec<MeetingUpdate>,
) -> Result<MeetingsResponse> {
    let user = require_user(user)?;
    for update in &updates {
        validate_update(update)?;
    }

    let started = Instant::now();
    info!(count = updates.len(), "updating meetings");
    let outcomes = ctx.batch.update_meetings(user, updates).await;
    let response = MeetingsResponse::from_outcomes(outcomes);
    log_command_execution("meetings::update", started.elapsed(), response.is_complete_success());
    Ok(response)
}

/// Delete meetings, best-effort cleaning up their external resources.
pub async fn delete_meetings(
    ctx: &AppContext,
    user: Option<&UserContext>,
    ids: &[i64],
) -> Result<usize> {
    let user = require_user(user)?;

    let started = Instant::now();
    info!(count = ids.len(), "deleting meetings");
    let result = ctx.batch.delete_meetings(user, ids).await;
    log_command_execution("meetings::delete", started.elapsed(), result.is_ok());
    result
}

/// Read meetings by filter. No external systems are touched.
pub async fn get_meetings(
    ctx: &AppContext,
    user: Option<&UserContext>,
    filter: MeetingFilter,
) -> Result<Vec<Meeting>> {
    require_user(user)?;
    ctx.meetings.find(&filter).await
}
