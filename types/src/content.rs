//! Content records read by the rule engine: posts, accounts, blog entries.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{AccountName, Timestamp, WiseError};

/// A chain asset amount with three decimal places (e.g. `"1.234 SBD"`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Asset {
    /// Amount in thousandths of a unit.
    pub milli: i64,
    pub symbol: String,
}

impl Asset {
    pub fn new(milli: i64, symbol: impl Into<String>) -> Self {
        Self {
            milli,
            symbol: symbol.into(),
        }
    }

    pub fn as_f64(&self) -> f64 {
        self.milli as f64 / 1000.0
    }
}

impl FromStr for Asset {
    type Err = WiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (amount, symbol) = s
            .trim()
            .split_once(' ')
            .ok_or_else(|| WiseError::InvalidAsset(s.to_string()))?;
        let (units, fraction) = amount.split_once('.').unwrap_or((amount, "0"));
        if fraction.len() > 3 {
            return Err(WiseError::InvalidAsset(s.to_string()));
        }
        let negative = units.starts_with('-');
        let units: i64 = units
            .parse()
            .map_err(|_| WiseError::InvalidAsset(s.to_string()))?;
        let fraction: i64 = format!("{fraction:0<3}")
            .parse()
            .map_err(|_| WiseError::InvalidAsset(s.to_string()))?;
        let fraction = if negative { -fraction } else { fraction };
        Ok(Self::new(units * 1000 + fraction, symbol.trim()))
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.milli < 0 { "-" } else { "" };
        let abs = self.milli.unsigned_abs();
        write!(f, "{sign}{}.{:03} {}", abs / 1000, abs % 1000, self.symbol)
    }
}

/// A post (or comment) as seen by rules.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub author: AccountName,
    pub permlink: String,
    pub created: Timestamp,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Accounts that have already voted on the post.
    #[serde(default)]
    pub active_voters: Vec<AccountName>,
    /// Pending plus already paid-out value.
    pub payout: Asset,
}

/// Account properties relevant to rules.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub name: AccountName,
    /// Current voting power in basis points (0..=10000).
    pub voting_power: u16,
}

/// An entry of an account's blog feed (own posts and reblogs).
///
/// `entry_id` counts from 0 for the oldest entry of the blog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogEntry {
    pub blog: AccountName,
    pub entry_id: u32,
    pub author: AccountName,
    pub permlink: String,
}
