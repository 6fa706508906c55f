//! Video-conference service integration

mod client;
mod types;

pub use client::HttpVideoClient;
