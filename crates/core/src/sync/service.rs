//! Meeting reconciler
//!
//! Drives the link resolver for each resource kind, sequences the
//! cross-resource dependencies (video first, then registry, then calendar),
//! applies the per-kind failure policy, and computes the sparse column set
//! to persist.
//!
//! Ordering is a data dependency, not a lock: the video handle feeds the
//! registry and calendar descriptions, and the registry outcome feeds the
//! calendar description. The video call and the session/organization reads
//! have no dependency on each other and run concurrently.

use std::sync::Arc;

use futures::future;
use gavel_domain::{
    CalendarChange, CalendarRef, GavelError, Meeting, MeetingChanges, MeetingCreate, RegistryChange,
    RegistryRef, Result, Session, UserContext, VideoChange, VideoConference, VideoRef,
};
use gavel_domain::{Breakout, Organization};
use serde::Serialize;
use tracing::{debug, instrument, warn};

use super::params;
use super::policy::{failure_mode, FailureMode, ResourceKind, SyncOp};
use super::ports::{
    CalendarClient, MeetingRepository, OrganizationProvider, RegistryClient, SessionProvider,
    VideoClient,
};
use super::resolver::{resolve_link, LinkAction};

/// Result of reconciling one meeting.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncOutcome {
    pub meeting: Meeting,
    /// Video conference produced or refreshed by this reconciliation
    pub video: Option<VideoConference>,
    /// Breakout produced or refreshed by this reconciliation
    pub breakout: Option<Breakout>,
}

/// Net effect of one resource-kind step on its link column.
#[derive(Debug, Clone, PartialEq)]
enum LinkOutcome<R> {
    Unchanged,
    Set(R),
    Cleared,
}

impl<R: Clone> LinkOutcome<R> {
    /// Store-facing column value: `None` = leave alone, `Some(None)` =
    /// clear, `Some(Some(_))` = set.
    fn column(&self) -> Option<Option<R>> {
        match self {
            Self::Unchanged => None,
            Self::Set(r) => Some(Some(r.clone())),
            Self::Cleared => Some(None),
        }
    }

    /// Resolve against the pre-step link value.
    fn into_link(self, current: Option<R>) -> Option<R> {
        match self {
            Self::Unchanged => current,
            Self::Set(r) => Some(r),
            Self::Cleared => None,
        }
    }
}

struct VideoStep {
    link: LinkOutcome<VideoRef>,
    resource: Option<VideoConference>,
}

impl VideoStep {
    fn untouched() -> Self {
        Self { link: LinkOutcome::Unchanged, resource: None }
    }
}

struct RegistryStep {
    link: LinkOutcome<RegistryRef>,
    resource: Option<Breakout>,
}

impl RegistryStep {
    fn untouched() -> Self {
        Self { link: LinkOutcome::Unchanged, resource: None }
    }
}

struct CalendarStep {
    link: LinkOutcome<CalendarRef>,
}

impl CalendarStep {
    fn untouched() -> Self {
        Self { link: LinkOutcome::Unchanged }
    }
}

/// The meeting reconciler service.
pub struct MeetingSyncService {
    meetings: Arc<dyn MeetingRepository>,
    video: Arc<dyn VideoClient>,
    calendar: Arc<dyn CalendarClient>,
    registry: Arc<dyn RegistryClient>,
    sessions: Arc<dyn SessionProvider>,
    organizations: Arc<dyn OrganizationProvider>,
}

impl MeetingSyncService {
    /// Create a new reconciler over the given collaborators.
    pub fn new(
        meetings: Arc<dyn MeetingRepository>,
        video: Arc<dyn VideoClient>,
        calendar: Arc<dyn CalendarClient>,
        registry: Arc<dyn RegistryClient>,
        sessions: Arc<dyn SessionProvider>,
        organizations: Arc<dyn OrganizationProvider>,
    ) -> Self {
        Self { meetings, video, calendar, registry, sessions, organizations }
    }

    /// Create a meeting and provision its requested external resources.
    ///
    /// Registry and video failures propagate; calendar failures are logged
    /// and the meeting is created without a calendar link.
    #[instrument(skip(self, user, create), fields(organization_id = create.organization_id))]
    pub async fn add(&self, user: &UserContext, create: MeetingCreate) -> Result<SyncOutcome> {
        let mut target = Meeting {
            id: 0,
            organization_id: create.organization_id,
            start: create.start,
            end: create.end,
            timezone: create.timezone.clone(),
            summary: create.summary.clone(),
            location: create.location.clone(),
            is_cancelled: create.is_cancelled,
            has_motions: create.has_motions,
            session_id: create.session_id,
            room_id: create.room_id,
            video_link: None,
            calendar_link: None,
            registry_link: None,
        };

        let (video_step, session, org) = tokio::join!(
            self.video_step(None, &create.video, &target, true, SyncOp::Add),
            self.load_session(create.session_id),
            self.organizations.get(create.organization_id),
        );
        let video_step = video_step?;
        let session = session?;
        let org = org?;

        let registry_step = self
            .registry_step(
                user,
                None,
                &create.registry,
                &target,
                session.as_ref(),
                video_step.resource.as_ref(),
                true,
                SyncOp::Add,
            )
            .await?;
        let calendar_step = self
            .calendar_step(
                None,
                &create.calendar,
                &target,
                &org,
                video_step.resource.as_ref(),
                registry_step.resource.as_ref(),
                true,
                SyncOp::Add,
            )
            .await?;

        target.video_link = video_step.link.clone().into_link(None);
        target.registry_link = registry_step.link.clone().into_link(None);
        target.calendar_link = calendar_step.link.clone().into_link(None);

        let id = self.meetings.insert(&target).await?;
        let meeting = self.meetings.get(id).await?;
        debug!(meeting_id = id, "meeting created");
        Ok(SyncOutcome { meeting, video: video_step.resource, breakout: registry_step.resource })
    }

    /// Reconcile an existing meeting against the requested changes.
    ///
    /// Idempotent with respect to already-applied external state: replaying
    /// the same change request converges instead of duplicating resources,
    /// except `ProvisionNew`, which always provisions fresh.
    #[instrument(skip(self, user, changes), fields(meeting_id = id))]
    pub async fn update(
        &self,
        user: &UserContext,
        id: i64,
        changes: MeetingChanges,
    ) -> Result<SyncOutcome> {
        let current = self.meetings.get(id).await?;
        let target = changes.apply_to(&current);
        let dirty = changes.params_dirty();

        // No-op detection: nothing externally visible changed and no link
        // request, so no client is contacted at all.
        if !dirty
            && changes.video.is_unchanged()
            && changes.calendar.is_unchanged()
            && changes.registry.is_unchanged()
        {
            let set = changes.to_change_set();
            if !set.is_empty() {
                self.meetings.update(id, &set).await?;
            }
            let meeting = self.meetings.get(id).await?;
            return Ok(SyncOutcome { meeting, video: None, breakout: None });
        }

        let (video_step, session, org) = tokio::join!(
            self.video_step(current.video_link.as_ref(), &changes.video, &target, dirty, SyncOp::Update),
            self.load_session(target.session_id),
            self.organizations.get(target.organization_id),
        );
        let video_step = video_step?;
        let session = session?;
        let org = org?;

        let registry_step = self
            .registry_step(
                user,
                current.registry_link.as_ref(),
                &changes.registry,
                &target,
                session.as_ref(),
                video_step.resource.as_ref(),
                dirty,
                SyncOp::Update,
            )
            .await?;
        let calendar_step = self
            .calendar_step(
                current.calendar_link.as_ref(),
                &changes.calendar,
                &target,
                &org,
                video_step.resource.as_ref(),
                registry_step.resource.as_ref(),
                dirty,
                SyncOp::Update,
            )
            .await?;

        let mut set = changes.to_change_set();
        set.video_link = video_step.link.column();
        set.calendar_link = calendar_step.link.column();
        set.registry_link = registry_step.link.column();

        if !set.is_empty() {
            self.meetings.update(id, &set).await?;
        }
        let meeting = self.meetings.get(id).await?;
        Ok(SyncOutcome { meeting, video: video_step.resource, breakout: registry_step.resource })
    }

    /// Delete meetings, best-effort removing their external resources
    /// first. Returns the number of rows actually deleted.
    #[instrument(skip(self, user))]
    pub async fn delete(&self, user: &UserContext, ids: &[i64]) -> Result<usize> {
        let results = future::join_all(ids.iter().map(|id| self.delete_one(user, *id))).await;
        let mut deleted = 0;
        for result in results {
            deleted += result?;
        }
        Ok(deleted)
    }

    async fn delete_one(&self, user: &UserContext, id: i64) -> Result<usize> {
        let meeting = match self.meetings.get(id).await {
            Ok(m) => m,
            Err(e) if e.is_not_found() => return Ok(0),
            Err(e) => return Err(e),
        };

        if let Some(link) = &meeting.video_link {
            self.attempt(ResourceKind::Video, SyncOp::Delete, self.delete_video(link)).await?;
        }
        if let Some(link) = &meeting.calendar_link {
            self.attempt(ResourceKind::Calendar, SyncOp::Delete, self.delete_event(link)).await?;
        }
        if let Some(link) = &meeting.registry_link {
            self.attempt(ResourceKind::Registry, SyncOp::Delete, self.delete_breakout(user, link))
                .await?;
        }

        self.meetings.delete(&[id]).await
    }

    /// Run one backend step under the failure policy: fatal errors
    /// propagate, non-fatal ones are logged and reported as `None`.
    async fn attempt<T, F>(&self, kind: ResourceKind, op: SyncOp, fut: F) -> Result<Option<T>>
    where
        F: std::future::Future<Output = Result<T>>,
    {
        match fut.await {
            Ok(v) => Ok(Some(v)),
            Err(err) => match failure_mode(kind, op) {
                FailureMode::Fatal => Err(err),
                FailureMode::WarnAndContinue => {
                    warn!(kind = %kind, op = %op, error = %err, "sync step failed; continuing");
                    Ok(None)
                }
            },
        }
    }

    async fn load_session(&self, session_id: Option<i64>) -> Result<Option<Session>> {
        match session_id {
            Some(id) => Ok(Some(self.sessions.get(id).await?)),
            None => Ok(None),
        }
    }

    /* ---------------------------------------------------------------- */
    /* Video                                                            */
    /* ---------------------------------------------------------------- */

    async fn video_step(
        &self,
        current: Option<&VideoRef>,
        requested: &VideoChange,
        target: &Meeting,
        dirty: bool,
        op: SyncOp,
    ) -> Result<VideoStep> {
        let action = resolve_link(current, requested, dirty);
        if action == LinkAction::NoOp {
            return Ok(VideoStep::untouched());
        }
        let applied =
            self.attempt(ResourceKind::Video, op, self.apply_video(current, action, target)).await?;
        Ok(applied.unwrap_or_else(VideoStep::untouched))
    }

    async fn apply_video(
        &self,
        current: Option<&VideoRef>,
        action: LinkAction<i64, VideoRef>,
        target: &Meeting,
    ) -> Result<VideoStep> {
        match action {
            LinkAction::NoOp => Ok(VideoStep::untouched()),
            LinkAction::Create(account_id) => self.create_video(account_id, target).await,
            LinkAction::AdoptAndUpdate(r) => self.adopt_video(r, target).await,
            LinkAction::UpdateInPlace => {
                let link = current_link(current)?;
                let existing = match self.video.get(link.account_id, &link.conference_id).await {
                    Ok(v) => v,
                    Err(e) if e.is_not_found() => return Ok(Self::video_drift(link)),
                    Err(e) => return Err(e),
                };
                let merged = params::video_params(target).merge_onto(&existing);
                match self.video.update(link.account_id, &link.conference_id, &merged).await {
                    Ok(updated) => {
                        Ok(VideoStep { link: LinkOutcome::Unchanged, resource: Some(updated) })
                    }
                    Err(e) if e.is_not_found() => Ok(Self::video_drift(link)),
                    Err(e) => Err(e),
                }
            }
            LinkAction::Delete => {
                self.delete_video(current_link(current)?).await?;
                Ok(VideoStep { link: LinkOutcome::Cleared, resource: None })
            }
            LinkAction::DeleteThenCreate(account_id) => {
                self.delete_video(current_link(current)?).await?;
                self.create_video(account_id, target).await
            }
            LinkAction::DeleteThenAdopt(r) => {
                self.delete_video(current_link(current)?).await?;
                self.adopt_video(r, target).await
            }
        }
    }

    fn video_drift(link: &VideoRef) -> VideoStep {
        warn!(
            account_id = link.account_id,
            conference_id = %link.conference_id,
            "linked video conference vanished out-of-band; clearing link"
        );
        VideoStep { link: LinkOutcome::Cleared, resource: None }
    }

    async fn create_video(&self, account_id: i64, target: &Meeting) -> Result<VideoStep> {
        let created = self.video.add(account_id, &params::video_params(target)).await?;
        let link = VideoRef { account_id, conference_id: created.id.clone() };
        Ok(VideoStep { link: LinkOutcome::Set(link), resource: Some(created) })
    }

    async fn adopt_video(&self, r: VideoRef, target: &Meeting) -> Result<VideoStep> {
        // Merge on top of the provider's current state so fields the caller
        // did not touch keep their values.
        let existing = self.video.get(r.account_id, &r.conference_id).await?;
        let merged = params::video_params(target).merge_onto(&existing);
        let updated = self.video.update(r.account_id, &r.conference_id, &merged).await?;
        Ok(VideoStep { link: LinkOutcome::Set(r), resource: Some(updated) })
    }

    async fn delete_video(&self, link: &VideoRef) -> Result<()> {
        match self.video.delete(link.account_id, &link.conference_id).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => {
                debug!(conference_id = %link.conference_id, "video conference already gone");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /* ---------------------------------------------------------------- */
    /* Registry                                                         */
    /* ---------------------------------------------------------------- */

    #[allow(clippy::too_many_arguments)]
    async fn registry_step(
        &self,
        user: &UserContext,
        current: Option<&RegistryRef>,
        requested: &RegistryChange,
        target: &Meeting,
        session: Option<&Session>,
        video: Option<&VideoConference>,
        dirty: bool,
        op: SyncOp,
    ) -> Result<RegistryStep> {
        let action = resolve_link(current, requested, dirty);
        if action == LinkAction::NoOp {
            return Ok(RegistryStep::untouched());
        }
        let applied = self
            .attempt(
                ResourceKind::Registry,
                op,
                self.apply_registry(user, current, action, target, session, video),
            )
            .await?;
        Ok(applied.unwrap_or_else(RegistryStep::untouched))
    }

    async fn apply_registry(
        &self,
        user: &UserContext,
        current: Option<&RegistryRef>,
        action: LinkAction<i64, RegistryRef>,
        target: &Meeting,
        session: Option<&Session>,
        video: Option<&VideoConference>,
    ) -> Result<RegistryStep> {
        match action {
            LinkAction::NoOp => Ok(RegistryStep::untouched()),
            LinkAction::Create(registry_meeting_id) => {
                let session = session_for_registry(session, target)?;
                self.create_breakout(user, registry_meeting_id, target, session, video).await
            }
            LinkAction::AdoptAndUpdate(r) => {
                let session = session_for_registry(session, target)?;
                self.adopt_breakout(user, r, target, session, video).await
            }
            LinkAction::UpdateInPlace => {
                let link = current_link(current)?;
                let session = session_for_registry(session, target)?;
                // Read first: a registry-side credit override must survive
                // the resync.
                let existing = match self
                    .registry
                    .get(user, link.registry_meeting_id, link.breakout_id)
                    .await
                {
                    Ok(b) => b,
                    Err(e) if e.is_not_found() => return Ok(Self::registry_drift(link)),
                    Err(e) => return Err(e),
                };
                let p = params::breakout_params(target, session, video, Some(&existing))?;
                match self
                    .registry
                    .update(user, link.registry_meeting_id, link.breakout_id, &p)
                    .await
                {
                    Ok(updated) => {
                        Ok(RegistryStep { link: LinkOutcome::Unchanged, resource: Some(updated) })
                    }
                    Err(e) if e.is_not_found() => Ok(Self::registry_drift(link)),
                    Err(e) => Err(e),
                }
            }
            LinkAction::Delete => {
                self.delete_breakout(user, current_link(current)?).await?;
                Ok(RegistryStep { link: LinkOutcome::Cleared, resource: None })
            }
            LinkAction::DeleteThenCreate(registry_meeting_id) => {
                self.delete_breakout(user, current_link(current)?).await?;
                let session = session_for_registry(session, target)?;
                self.create_breakout(user, registry_meeting_id, target, session, video).await
            }
            LinkAction::DeleteThenAdopt(r) => {
                self.delete_breakout(user, current_link(current)?).await?;
                let session = session_for_registry(session, target)?;
                self.adopt_breakout(user, r, target, session, video).await
            }
        }
    }

    fn registry_drift(link: &RegistryRef) -> RegistryStep {
        warn!(
            registry_meeting_id = link.registry_meeting_id,
            breakout_id = link.breakout_id,
            "linked breakout vanished out-of-band; clearing link"
        );
        RegistryStep { link: LinkOutcome::Cleared, resource: None }
    }

    async fn create_breakout(
        &self,
        user: &UserContext,
        registry_meeting_id: i64,
        target: &Meeting,
        session: &Session,
        video: Option<&VideoConference>,
    ) -> Result<RegistryStep> {
        let p = params::breakout_params(target, session, video, None)?;
        let created = self.registry.add(user, registry_meeting_id, &p).await?;
        let link = RegistryRef { registry_meeting_id, breakout_id: created.id };
        Ok(RegistryStep { link: LinkOutcome::Set(link), resource: Some(created) })
    }

    async fn adopt_breakout(
        &self,
        user: &UserContext,
        r: RegistryRef,
        target: &Meeting,
        session: &Session,
        video: Option<&VideoConference>,
    ) -> Result<RegistryStep> {
        let existing = self.registry.get(user, r.registry_meeting_id, r.breakout_id).await?;
        let p = params::breakout_params(target, session, video, Some(&existing))?;
        let updated = self.registry.update(user, r.registry_meeting_id, r.breakout_id, &p).await?;
        Ok(RegistryStep { link: LinkOutcome::Set(r), resource: Some(updated) })
    }

    async fn delete_breakout(&self, user: &UserContext, link: &RegistryRef) -> Result<()> {
        match self.registry.delete(user, link.registry_meeting_id, &[link.breakout_id]).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_not_found() => {
                debug!(breakout_id = link.breakout_id, "breakout already gone");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /* ---------------------------------------------------------------- */
    /* Calendar                                                         */
    /* ---------------------------------------------------------------- */

    #[allow(clippy::too_many_arguments)]
    async fn calendar_step(
        &self,
        current: Option<&CalendarRef>,
        requested: &CalendarChange,
        target: &Meeting,
        org: &Organization,
        video: Option<&VideoConference>,
        breakout: Option<&Breakout>,
        dirty: bool,
        op: SyncOp,
    ) -> Result<CalendarStep> {
        let action = resolve_link(current, requested, dirty);
        if action == LinkAction::NoOp {
            return Ok(CalendarStep::untouched());
        }
        let applied = self
            .attempt(
                ResourceKind::Calendar,
                op,
                self.apply_calendar(current, action, target, org, video, breakout),
            )
            .await?;
        Ok(applied.unwrap_or_else(CalendarStep::untouched))
    }

    async fn apply_calendar(
        &self,
        current: Option<&CalendarRef>,
        action: LinkAction<i64, CalendarRef>,
        target: &Meeting,
        org: &Organization,
        video: Option<&VideoConference>,
        breakout: Option<&Breakout>,
    ) -> Result<CalendarStep> {
        let p = params::calendar_params(target, org, video, breakout);
        match action {
            LinkAction::NoOp => Ok(CalendarStep::untouched()),
            LinkAction::Create(account_id) => {
                let created = self.calendar.add(account_id, &p).await?;
                let link = CalendarRef { account_id, event_id: created.id };
                Ok(CalendarStep { link: LinkOutcome::Set(link) })
            }
            LinkAction::AdoptAndUpdate(r) => {
                self.calendar.update(r.account_id, &r.event_id, &p).await?;
                Ok(CalendarStep { link: LinkOutcome::Set(r) })
            }
            LinkAction::UpdateInPlace => {
                let link = current_link(current)?;
                // Params always carry Confirmed status: a provider-side
                // "deleted" event lingers as cancelled and must be revived.
                match self.calendar.update(link.account_id, &link.event_id, &p).await {
                    Ok(_) => Ok(CalendarStep { link: LinkOutcome::Unchanged }),
                    Err(e) if e.is_not_found() => {
                        warn!(event_id = %link.event_id, "linked calendar event vanished; clearing link");
                        Ok(CalendarStep { link: LinkOutcome::Cleared })
                    }
                    Err(e) => Err(e),
                }
            }
            LinkAction::Delete => {
                self.delete_event(current_link(current)?).await?;
                Ok(CalendarStep { link: LinkOutcome::Cleared })
            }
            LinkAction::DeleteThenCreate(account_id) => {
                self.delete_event(current_link(current)?).await?;
                let created = self.calendar.add(account_id, &p).await?;
                let link = CalendarRef { account_id, event_id: created.id };
                Ok(CalendarStep { link: LinkOutcome::Set(link) })
            }
            LinkAction::DeleteThenAdopt(r) => {
                self.delete_event(current_link(current)?).await?;
                self.calendar.update(r.account_id, &r.event_id, &p).await?;
                Ok(CalendarStep { link: LinkOutcome::Set(r) })
            }
        }
    }

    async fn delete_event(&self, link: &CalendarRef) -> Result<()> {
        match self.calendar.delete(link.account_id, &link.event_id).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => {
                debug!(event_id = %link.event_id, "calendar event already gone");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

/// The resolver only emits link-consuming actions when a link exists, so a
/// missing one here is a reconciler bug, not caller input.
fn current_link<R>(current: Option<&R>) -> Result<&R> {
    current.ok_or_else(|| GavelError::Internal("link action without a current link".into()))
}

fn session_for_registry<'a>(session: Option<&'a Session>, target: &Meeting) -> Result<&'a Session> {
    session.ok_or_else(|| {
        GavelError::Validation(format!(
            "meeting {} has no session; a registry breakout requires one",
            target.id
        ))
    })
}
