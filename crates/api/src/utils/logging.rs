//! Command execution logging

use std::time::Duration;

use tracing::{info, warn};

/// Log one command execution with its duration and outcome.
#[allow(clippy::cast_possible_truncation)]
pub fn log_command_execution(command: &str, elapsed: Duration, success: bool) {
    let elapsed_ms = elapsed.as_millis() as u64;
    if success {
        info!(command, elapsed_ms, "command completed");
    } else {
        warn!(command, elapsed_ms, "command completed with element failures");
    }
}
