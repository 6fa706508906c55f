//! Shared test helpers for `gavel-core` integration tests.
//!
//! In-memory mocks for every reconciler port plus meeting/session fixtures,
//! so the property tests can focus on behaviour instead of boilerplate.

pub mod clients;
pub mod fixtures;
pub mod repositories;

pub use clients::{
    MockCalendarClient, MockOrganizationProvider, MockRegistryClient, MockSessionProvider,
    MockVideoClient,
};
pub use fixtures::*;
pub use repositories::InMemoryMeetingRepository;
