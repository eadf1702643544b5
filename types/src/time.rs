//! Timestamp type used throughout the protocol.
//!
//! Timestamps are Unix epoch seconds (UTC). Chain nodes report block times
//! as `YYYY-MM-DDTHH:MM:SS` without a zone suffix; those are UTC too.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::WiseError;

const CHAIN_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A Unix timestamp in seconds since epoch (UTC).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The epoch (time zero).
    pub const EPOCH: Self = Self(0);

    pub fn new(secs: u64) -> Self {
        Self(secs)
    }

    /// Get the current system time as a `Timestamp`.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// Seconds elapsed since this timestamp (relative to `now`).
    pub fn elapsed_since(&self, now: Timestamp) -> u64 {
        now.0.saturating_sub(self.0)
    }

    /// This timestamp moved `secs` into the past, clamped at the epoch.
    pub fn minus_secs(&self, secs: u64) -> Timestamp {
        Self(self.0.saturating_sub(secs))
    }

    pub fn plus_secs(&self, secs: u64) -> Timestamp {
        Self(self.0.saturating_add(secs))
    }

    /// Parse either a chain-style time (`2018-06-01T12:00:00`, UTC implied)
    /// or a full RFC 3339 date-time.
    pub fn parse(raw: &str) -> Result<Self, WiseError> {
        let secs = match NaiveDateTime::parse_from_str(raw, CHAIN_TIME_FORMAT) {
            Ok(naive) => naive.and_utc().timestamp(),
            Err(_) => DateTime::parse_from_rfc3339(raw)
                .map_err(|e| WiseError::InvalidTimestamp(format!("{raw}: {e}")))?
                .timestamp(),
        };
        u64::try_from(secs)
            .map(Self)
            .map_err(|_| WiseError::InvalidTimestamp(format!("{raw} is before the epoch")))
    }

    /// Render in the chain's own format.
    pub fn to_chain_string(&self) -> String {
        i64::try_from(self.0)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(|dt| dt.format(CHAIN_TIME_FORMAT).to_string())
            .unwrap_or_else(|| self.0.to_string())
    }
}

impl FromStr for Timestamp {
    type Err = WiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}
