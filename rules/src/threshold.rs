//! Single-comparison rules against a value fetched from the context.

use serde::{Deserialize, Serialize};
use std::fmt;
use wise_types::MAX_VOTE_WEIGHT;

use crate::{ContextError, RuleError, ValidationContext, Verdict, VoteOrder};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonMode {
    MoreThan,
    LessThan,
    Equal,
}

impl ComparisonMode {
    /// Whether `actual <mode> expected` holds.
    pub fn holds<T: PartialOrd>(&self, actual: T, expected: T) -> bool {
        match self {
            Self::MoreThan => actual > expected,
            Self::LessThan => actual < expected,
            Self::Equal => actual == expected,
        }
    }
}

impl fmt::Display for ComparisonMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MoreThan => "more than",
            Self::LessThan => "less than",
            Self::Equal => "equal to",
        })
    }
}

/// Compares the delegator's current voting power (basis points).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawVotingPowerRule")]
pub struct VotingPowerRule {
    pub mode: ComparisonMode,
    pub value: u16,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawVotingPowerRule {
    mode: ComparisonMode,
    value: i64,
}

impl TryFrom<RawVotingPowerRule> for VotingPowerRule {
    type Error = RuleError;

    fn try_from(raw: RawVotingPowerRule) -> Result<Self, Self::Error> {
        let value = u16::try_from(raw.value)
            .ok()
            .filter(|v| *v <= MAX_VOTE_WEIGHT.unsigned_abs())
            .ok_or_else(|| RuleError::InvalidValue {
                rule: "voting_power",
                reason: format!("{} is outside 0..=10000", raw.value),
            })?;
        Ok(Self {
            mode: raw.mode,
            value,
        })
    }
}

impl VotingPowerRule {
    pub async fn validate(&self, ctx: &dyn ValidationContext) -> Result<Verdict, ContextError> {
        let account = ctx.account(ctx.delegator()).await?;
        Ok(Verdict::check(
            self.mode.holds(account.voting_power, self.value),
            || {
                format!(
                    "Voting power of the delegator ({}) is not {} {}",
                    account.voting_power, self.mode, self.value
                )
            },
        ))
    }
}

/// Compares the post's total payout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPayoutRule")]
pub struct PayoutRule {
    pub mode: ComparisonMode,
    pub value: f64,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPayoutRule {
    mode: ComparisonMode,
    value: f64,
}

impl TryFrom<RawPayoutRule> for PayoutRule {
    type Error = RuleError;

    fn try_from(raw: RawPayoutRule) -> Result<Self, Self::Error> {
        if !raw.value.is_finite() || raw.value < 0.0 {
            return Err(RuleError::InvalidValue {
                rule: "payout",
                reason: format!("{} is not a non-negative amount", raw.value),
            });
        }
        Ok(Self {
            mode: raw.mode,
            value: raw.value,
        })
    }
}

impl PayoutRule {
    pub async fn validate(
        &self,
        order: &VoteOrder,
        ctx: &dyn ValidationContext,
    ) -> Result<Verdict, ContextError> {
        let post = ctx.post(&order.author, &order.permlink).await?;
        // Payouts carry three decimals; compare in thousandths to keep `equal` exact.
        let expected = (self.value * 1000.0).round() as i64;
        Ok(Verdict::check(self.mode.holds(post.payout.milli, expected), || {
            format!("Payout of the post ({}) is not {} {}", post.payout, self.mode, self.value)
        }))
    }
}

/// Compares how many accounts voted on the post.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VotesCountRule {
    pub mode: ComparisonMode,
    pub value: u32,
}

impl VotesCountRule {
    pub async fn validate(
        &self,
        order: &VoteOrder,
        ctx: &dyn ValidationContext,
    ) -> Result<Verdict, ContextError> {
        let post = ctx.post(&order.author, &order.permlink).await?;
        let count = post.active_voters.len() as u64;
        Ok(Verdict::check(self.mode.holds(count, u64::from(self.value)), || {
            format!("Votes count of the post ({count}) is not {} {}", self.mode, self.value)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{post, MockContext};
    use serde_json::json;
    use wise_types::AccountInfo;

    fn order() -> VoteOrder {
        VoteOrder::new("r", "author", "p", 100)
    }

    #[test]
    fn comparison_modes() {
        assert!(ComparisonMode::MoreThan.holds(5, 4));
        assert!(!ComparisonMode::MoreThan.holds(4, 4));
        assert!(ComparisonMode::LessThan.holds(3, 4));
        assert!(ComparisonMode::Equal.holds(4, 4));
    }

    #[tokio::test]
    async fn voting_power_reads_the_delegator() {
        let mut ctx = MockContext::new();
        ctx.accounts.push(AccountInfo {
            name: "delegator".into(),
            voting_power: 8000,
        });
        let rule = VotingPowerRule {
            mode: ComparisonMode::MoreThan,
            value: 5000,
        };
        assert!(rule.validate(&ctx).await.unwrap().is_accept());
        let rule = VotingPowerRule {
            mode: ComparisonMode::LessThan,
            value: 5000,
        };
        assert!(!rule.validate(&ctx).await.unwrap().is_accept());
    }

    #[tokio::test]
    async fn payout_compares_in_thousandths() {
        // payout 1.500 SBD
        let ctx = MockContext::new().with_post(post("author", "p"));
        let equal = PayoutRule {
            mode: ComparisonMode::Equal,
            value: 1.5,
        };
        assert!(equal.validate(&order(), &ctx).await.unwrap().is_accept());
        let less = PayoutRule {
            mode: ComparisonMode::LessThan,
            value: 1.0,
        };
        assert!(!less.validate(&order(), &ctx).await.unwrap().is_accept());
    }

    #[tokio::test]
    async fn votes_count_counts_active_voters() {
        // two voters
        let ctx = MockContext::new().with_post(post("author", "p"));
        let rule = VotesCountRule {
            mode: ComparisonMode::Equal,
            value: 2,
        };
        assert!(rule.validate(&order(), &ctx).await.unwrap().is_accept());
        let rule = VotesCountRule {
            mode: ComparisonMode::MoreThan,
            value: 2,
        };
        assert!(!rule.validate(&order(), &ctx).await.unwrap().is_accept());
    }

    #[test]
    fn construction_rejects_out_of_range_values() {
        let vp = json!({"mode": "more_than", "value": 10001});
        assert!(serde_json::from_value::<VotingPowerRule>(vp).is_err());
        let payout = json!({"mode": "equal", "value": -1.0});
        assert!(serde_json::from_value::<PayoutRule>(payout).is_err());
        let count = json!({"mode": "between", "value": 1});
        assert!(serde_json::from_value::<VotesCountRule>(count).is_err());
    }
}
