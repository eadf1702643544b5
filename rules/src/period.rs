use serde::{Deserialize, Serialize};

/// Unit of a duration written in a rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Day,
    Hour,
    Minute,
    Second,
}

impl TimeUnit {
    pub fn seconds(&self) -> u64 {
        match self {
            Self::Day => 24 * 60 * 60,
            Self::Hour => 60 * 60,
            Self::Minute => 60,
            Self::Second => 1,
        }
    }

    /// `amount` of this unit in seconds, saturating.
    pub fn to_seconds(&self, amount: u64) -> u64 {
        amount.saturating_mul(self.seconds())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Hour => "hour",
            Self::Minute => "minute",
            Self::Second => "second",
        }
    }
}
