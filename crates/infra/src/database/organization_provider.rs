//! SQLite-backed implementation of the OrganizationProvider port.

use std::sync::Arc;

use async_trait::async_trait;
use gavel_core::sync::ports::OrganizationProvider;
use gavel_domain::{GavelError, Organization, Result};
use tracing::instrument;

use super::manager::DbManager;
use crate::errors::InfraError;

/// SQLite implementation of the organization read.
pub struct SqliteOrganizationProvider {
    db: Arc<DbManager>,
}

impl SqliteOrganizationProvider {
    /// Create a new provider over the shared database manager.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrganizationProvider for SqliteOrganizationProvider {
    #[instrument(skip(self))]
    async fn get(&self, organization_id: i64) -> Result<Organization> {
        let conn = self.db.conn()?;
        conn.query_row(
            "SELECT id, name, display_name FROM organizations WHERE id = ?",
            [organization_id],
            |row| {
                Ok(Organization {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    display_name: row.get(2)?,
                })
            },
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => {
                GavelError::NotFound(format!("organization {organization_id}"))
            }
            other => InfraError::from(other).into(),
        })
    }
}
