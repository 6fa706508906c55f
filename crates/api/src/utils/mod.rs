//! Command utilities

pub mod logging;
