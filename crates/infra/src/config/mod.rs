//! Configuration loading
//!
//! Loads the application configuration from environment variables with a
//! TOML file fallback.

pub mod loader;

pub use loader::{load, load_from_env, load_from_file};
