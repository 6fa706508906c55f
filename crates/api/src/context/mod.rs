//! Application context - dependency injection container

use std::sync::Arc;

use gavel_core::sync::ports::MeetingRepository;
use gavel_core::{MeetingBatchService, MeetingSyncService};
use gavel_domain::{Config, Result};
use gavel_infra::{
    AccountClientRegistry, DbManager, HttpCalendarClient, HttpRegistryClient, HttpVideoClient,
    SqliteMeetingRepository, SqliteOrganizationProvider, SqliteSessionProvider,
};
use tracing::info;

/// Wired application state shared by all commands.
///
/// Built once at startup from configuration. The account-client registries
/// are the only mutable pieces; the auth-completion flow registers new
/// clients into them at runtime.
pub struct AppContext {
    pub config: Config,
    pub db: Arc<DbManager>,
    pub meetings: Arc<dyn MeetingRepository>,
    pub video_accounts: Arc<AccountClientRegistry>,
    pub calendar_accounts: Arc<AccountClientRegistry>,
    pub sync: Arc<MeetingSyncService>,
    pub batch: Arc<MeetingBatchService>,
}

impl AppContext {
    /// Wire the full context from configuration.
    pub fn new(config: Config) -> Result<Arc<Self>> {
        let db = Arc::new(DbManager::new(&config.database.path, config.database.pool_size)?);

        let meetings: Arc<dyn MeetingRepository> =
            Arc::new(SqliteMeetingRepository::new(db.clone()));
        let sessions = Arc::new(SqliteSessionProvider::new(db.clone()));
        let organizations = Arc::new(SqliteOrganizationProvider::new(db.clone()));

        let video_accounts = Arc::new(AccountClientRegistry::from_config(&config.video)?);
        let calendar_accounts = Arc::new(AccountClientRegistry::from_config(&config.calendar)?);

        let video =
            Arc::new(HttpVideoClient::new(config.video.base_url.clone(), video_accounts.clone()));
        let calendar = Arc::new(HttpCalendarClient::new(
            config.calendar.base_url.clone(),
            calendar_accounts.clone(),
        ));
        let registry = Arc::new(HttpRegistryClient::new(config.registry.base_url.clone())?);

        let sync = Arc::new(MeetingSyncService::new(
            meetings.clone(),
            video,
            calendar,
            registry,
            sessions,
            organizations,
        ));
        let batch = Arc::new(MeetingBatchService::new(sync.clone()));

        info!(
            video_accounts = video_accounts.len(),
            calendar_accounts = calendar_accounts.len(),
            "application context initialized"
        );
        Ok(Arc::new(Self {
            config,
            db,
            meetings,
            video_accounts,
            calendar_accounts,
            sync,
            batch,
        }))
    }
}
