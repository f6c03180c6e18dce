use chrono::FixedOffset;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};

/// Offset of the display timezone, Eastern Time without DST.
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = -5;

/// Seconds between two refreshes of the session display.
pub const DEFAULT_UPDATE_INTERVAL_SECS: u64 = 60 * 5;

pub const UTC_OFFSET_VAR: &str = "FOREX_UTC_OFFSET_HOURS";
pub const UPDATE_INTERVAL_VAR: &str = "FOREX_UPDATE_INTERVAL_SECS";

/// `ClockConfig` holds the display timezone offset and the
/// polling interval of the session clock.
#[derive(Debug, Clone, PartialEq)]
pub struct ClockConfig {
    pub utc_offset_hours: i32,
    pub update_interval: Duration,
}

impl Default for ClockConfig {
    fn default() -> Self {
        ClockConfig {
            utc_offset_hours: DEFAULT_UTC_OFFSET_HOURS,
            update_interval: Duration::from_secs(DEFAULT_UPDATE_INTERVAL_SECS),
        }
    }
}

impl ClockConfig {
    /// Builds the config from the environment, keeping the default
    /// for any variable that is missing or does not parse.
    pub fn from_env() -> ClockConfig {
        ClockConfig {
            utc_offset_hours: parse_or(env::var(UTC_OFFSET_VAR).ok(), DEFAULT_UTC_OFFSET_HOURS),
            update_interval: Duration::from_secs(parse_or(
                env::var(UPDATE_INTERVAL_VAR).ok(),
                DEFAULT_UPDATE_INTERVAL_SECS,
            )),
        }
    }

    pub fn display_timezone(&self) -> Result<FixedOffset> {
        self.utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or(Error::InvalidUtcOffset(self.utc_offset_hours))
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, default: T) -> T {
    raw.map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
