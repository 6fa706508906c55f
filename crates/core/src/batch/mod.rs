//! Batch orchestration
//!
//! Fans the reconciler out over arrays of requested creations, updates, and
//! deletions. Elements are independent: there is no cross-element
//! transactionality, no ordering guarantee between elements, and partial
//! success is the normal case — every element gets its own result.

use std::sync::Arc;

use futures::future;
use gavel_domain::{MeetingCreate, MeetingUpdate, Result, UserContext};
use tracing::instrument;

use crate::sync::service::{MeetingSyncService, SyncOutcome};

/// Orchestrates batches of meeting operations over the reconciler.
pub struct MeetingBatchService {
    sync: Arc<MeetingSyncService>,
}

impl MeetingBatchService {
    /// Create a new batch orchestrator.
    pub fn new(sync: Arc<MeetingSyncService>) -> Self {
        Self { sync }
    }

    /// Create all requested meetings concurrently, one result per element.
    #[instrument(skip(self, user, creates), fields(count = creates.len()))]
    pub async fn add_meetings(
        &self,
        user: &UserContext,
        creates: Vec<MeetingCreate>,
    ) -> Vec<Result<SyncOutcome>> {
        future::join_all(creates.into_iter().map(|create| self.sync.add(user, create))).await
    }

    /// Reconcile all requested updates concurrently, one result per element.
    #[instrument(skip(self, user, updates), fields(count = updates.len()))]
    pub async fn update_meetings(
        &self,
        user: &UserContext,
        updates: Vec<MeetingUpdate>,
    ) -> Vec<Result<SyncOutcome>> {
        future::join_all(
            updates.into_iter().map(|update| self.sync.update(user, update.id, update.changes)),
        )
        .await
    }

    /// Delete the given meetings, returning how many rows were removed.
    #[instrument(skip(self, user))]
    pub async fn delete_meetings(&self, user: &UserContext, ids: &[i64]) -> Result<usize> {
        self.sync.delete(user, ids).await
    }
}
