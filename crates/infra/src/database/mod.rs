//! Database implementations

pub mod manager;
pub mod meeting_repository;
pub mod organization_provider;
pub mod session_provider;

pub use manager::DbManager;
pub use meeting_repository::SqliteMeetingRepository;
pub use organization_provider::SqliteOrganizationProvider;
pub use session_provider::SqliteSessionProvider;
