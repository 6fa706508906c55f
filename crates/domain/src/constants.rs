//! Application constants

/// Location marker written to a registry breakout for a cancelled meeting.
pub const CANCELLED_LOCATION: &str = "CANCELLED";

/// Prefix prepended to the breakout name of a cancelled meeting.
pub const CANCELLED_PREFIX: &str = "CANCELLED - ";

/// Default database connection pool size.
pub const DEFAULT_POOL_SIZE: u32 = 4;

/// Default calendar identifier for calendar-event provisioning.
pub const PRIMARY_CALENDAR_ID: &str = "primary";
