//! Retires a ruleset at a fixed point in time.

use serde::{Deserialize, Serialize};
use wise_types::Timestamp;

use crate::{RuleError, ValidationContext, Verdict};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawExpirationDateRule")]
pub struct ExpirationDateRule {
    /// The date as written by the delegator.
    pub date: String,
    #[serde(skip)]
    expires_at: Timestamp,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawExpirationDateRule {
    date: String,
}

impl TryFrom<RawExpirationDateRule> for ExpirationDateRule {
    type Error = RuleError;

    fn try_from(raw: RawExpirationDateRule) -> Result<Self, Self::Error> {
        Self::new(raw.date)
    }
}

impl ExpirationDateRule {
    pub fn new(date: impl Into<String>) -> Result<Self, RuleError> {
        let date = date.into();
        let expires_at =
            Timestamp::parse(&date).map_err(|e| RuleError::InvalidDate(e.to_string()))?;
        Ok(Self { date, expires_at })
    }

    pub fn expires_at(&self) -> Timestamp {
        self.expires_at
    }

    pub fn validate(&self, ctx: &dyn ValidationContext) -> Verdict {
        Verdict::check(ctx.now() <= self.expires_at, || {
            format!("Rules expired at {}", self.date)
        })
    }
}
