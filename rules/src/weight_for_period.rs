//! Caps the total weight the delegator spends within a rolling window.

use serde::{Deserialize, Serialize};

use crate::{ContextError, RuleError, TimeUnit, ValidationContext, Verdict, VoteOrder};

/// Rejects when the absolute weights cast since `now - period` plus the new
/// order would exceed `weight`.
///
/// Only accepted confirmations that carry a bound vote count: a rejected or
/// unbound confirmation never moved any voting power. Confirmations published
/// after `now` still count, since answers land in later blocks than the
/// orders they answer. The confirmation of the order being judged is skipped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWeightForPeriodRule")]
pub struct WeightForPeriodRule {
    pub period: u64,
    pub unit: TimeUnit,
    pub weight: u32,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawWeightForPeriodRule {
    period: u64,
    unit: TimeUnit,
    weight: u32,
}

impl TryFrom<RawWeightForPeriodRule> for WeightForPeriodRule {
    type Error = RuleError;

    fn try_from(raw: RawWeightForPeriodRule) -> Result<Self, Self::Error> {
        Self::new(raw.period, raw.unit, raw.weight)
    }
}

impl WeightForPeriodRule {
    pub fn new(period: u64, unit: TimeUnit, weight: u32) -> Result<Self, RuleError> {
        if period == 0 {
            return Err(RuleError::InvalidValue {
                rule: "weight_for_period",
                reason: "period must be positive".into(),
            });
        }
        Ok(Self {
            period,
            unit,
            weight,
        })
    }

    pub async fn validate(
        &self,
        order: &VoteOrder,
        ctx: &dyn ValidationContext,
    ) -> Result<Verdict, ContextError> {
        let now = ctx.now();
        let since = now.minus_secs(self.unit.to_seconds(self.period));
        let spent: u64 = ctx
            .confirmations_since(ctx.delegator(), since)
            .await?
            .iter()
            .filter(|c| c.voteorder_tx_id != ctx.voteorder_tx_id())
            .filter_map(|c| c.cast_vote())
            .map(|vote| u64::from(vote.weight.unsigned_abs()))
            .sum();
        let total = spent + u64::from(order.weight.unsigned_abs());

        Ok(Verdict::check(total <= u64::from(self.weight), || {
            format!(
                "Weight in the last {} {}(s) would reach {total}, above the limit of {}",
                self.period,
                self.unit.as_str(),
                self.weight
            )
        }))
    }
}
