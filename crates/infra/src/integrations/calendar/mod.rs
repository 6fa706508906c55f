//! Calendar service integration

mod client;
mod types;

pub use client::HttpCalendarClient;
