//! Calendar REST adapter

use std::sync::Arc;

use async_trait::async_trait;
use gavel_core::sync::ports::CalendarClient;
use gavel_domain::constants::PRIMARY_CALENDAR_ID;
use gavel_domain::{CalendarEvent, CalendarEventParams, Result};
use tracing::{debug, instrument};

use super::types::{EventRequest, EventResource};
use crate::accounts::AccountClientRegistry;
use crate::errors::InfraError;
use crate::integrations::response_error;

/// REST implementation of the calendar client port.
///
/// The provider soft-deletes events (they linger as `cancelled`), which is
/// why every update body carries an explicit status; a delete of an
/// already-purged event comes back 404/410 and is mapped to `NotFound` for
/// the reconciler to swallow.
pub struct HttpCalendarClient {
    base_url: String,
    calendar_id: String,
    accounts: Arc<AccountClientRegistry>,
}

impl HttpCalendarClient {
    /// Create a new client against the account's primary calendar.
    pub fn new(base_url: impl Into<String>, accounts: Arc<AccountClientRegistry>) -> Self {
        Self {
            base_url: base_url.into(),
            calendar_id: PRIMARY_CALENDAR_ID.to_string(),
            accounts,
        }
    }

    /// Override the target calendar (tests, shared calendars).
    pub fn with_calendar_id(mut self, calendar_id: impl Into<String>) -> Self {
        self.calendar_id = calendar_id.into();
        self
    }

    fn events_url(&self) -> String {
        format!("{}/calendars/{}/events", self.base_url, self.calendar_id)
    }

    fn event_url(&self, event_id: &str) -> String {
        format!("{}/calendars/{}/events/{event_id}", self.base_url, self.calendar_id)
    }
}

#[async_trait]
impl CalendarClient for HttpCalendarClient {
    #[instrument(skip(self, params))]
    async fn add(&self, account_id: i64, params: &CalendarEventParams) -> Result<CalendarEvent> {
        let account = self.accounts.client(account_id)?;
        let url = self.events_url();
        let body = EventRequest::from(params);

        let response = account.send(|http| http.post(&url).json(&body)).await?;
        if !response.status().is_success() {
            return Err(response_error("calendar event create", response).await);
        }
        let resource: EventResource = response.json().await.map_err(InfraError::from)?;
        debug!(account_id, event_id = %resource.id, "calendar event created");
        resource.try_into()
    }

    #[instrument(skip(self, params))]
    async fn update(
        &self,
        account_id: i64,
        event_id: &str,
        params: &CalendarEventParams,
    ) -> Result<CalendarEvent> {
        let account = self.accounts.client(account_id)?;
        let url = self.event_url(event_id);
        let body = EventRequest::from(params);

        let response = account.send(|http| http.put(&url).json(&body)).await?;
        if !response.status().is_success() {
            return Err(response_error("calendar event update", response).await);
        }
        let resource: EventResource = response.json().await.map_err(InfraError::from)?;
        resource.try_into()
    }

    #[instrument(skip(self))]
    async fn delete(&self, account_id: i64, event_id: &str) -> Result<()> {
        let account = self.accounts.client(account_id)?;
        let url = self.event_url(event_id);

        let response = account.send(|http| http.delete(&url)).await?;
        if !response.status().is_success() {
            return Err(response_error("calendar event delete", response).await);
        }
        debug!(account_id, event_id, "calendar event deleted");
        Ok(())
    }
}
