//! # Gavel API
//!
//! Public operations of the meeting synchronization core, consumed by the
//! committee-administration CRUD layer (which lives outside this
//! repository).
//!
//! This crate contains:
//! - The application context: dependency-injection wiring from
//!   configuration to repositories, account clients, and services
//! - The batch meeting commands (`add_meetings`, `update_meetings`,
//!   `delete_meetings`, `get_meetings`)

pub mod commands;
pub mod context;
pub mod utils;

pub use commands::meetings::{
    add_meetings, delete_meetings, get_meetings, update_meetings, MeetingsResponse,
};
pub use context::AppContext;
