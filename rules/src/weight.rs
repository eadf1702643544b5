//! Limits the signed weight of a single vote.

use serde::{Deserialize, Serialize};
use wise_types::MAX_VOTE_WEIGHT;

use crate::{RuleError, Verdict, VoteOrder};

/// Passes iff `min <= weight <= max`. Negative weights are flags.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWeightRule")]
pub struct WeightRule {
    min: i16,
    max: i16,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawWeightRule {
    min: i64,
    max: i64,
}

impl TryFrom<RawWeightRule> for WeightRule {
    type Error = RuleError;

    fn try_from(raw: RawWeightRule) -> Result<Self, Self::Error> {
        let min = checked_weight(raw.min)?;
        let max = checked_weight(raw.max)?;
        Self::new(min, max)
    }
}

pub(crate) fn checked_weight(value: i64) -> Result<i16, RuleError> {
    i16::try_from(value)
        .ok()
        .filter(|w| w.unsigned_abs() <= MAX_VOTE_WEIGHT.unsigned_abs())
        .ok_or(RuleError::WeightOutOfRange(value))
}

impl WeightRule {
    pub fn new(min: i16, max: i16) -> Result<Self, RuleError> {
        checked_weight(min.into())?;
        checked_weight(max.into())?;
        if min > max {
            return Err(RuleError::InvertedRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> i16 {
        self.min
    }

    pub fn max(&self) -> i16 {
        self.max
    }

    pub fn validate(&self, order: &VoteOrder) -> Verdict {
        Verdict::check(
            (self.min..=self.max).contains(&order.weight),
            || {
                format!(
                    "Weight {} is outside the allowed range [{}, {}]",
                    order.weight, self.min, self.max
                )
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(weight: i16) -> VoteOrder {
        VoteOrder::new("default", "author", "permlink", weight)
    }

    #[test]
    fn accepts_the_inclusive_bounds() {
        let rule = WeightRule::new(-100, 50).unwrap();
        assert!(rule.validate(&order(-50)).is_accept());
        assert!(rule.validate(&order(50)).is_accept());
        assert!(rule.validate(&order(-100)).is_accept());
    }

    #[test]
    fn rejects_outside_the_range() {
        let rule = WeightRule::new(-100, 50).unwrap();
        assert!(!rule.validate(&order(51)).is_accept());
        assert!(!rule.validate(&order(-101)).is_accept());
    }

    #[test]
    fn construction_checks_bounds() {
        assert_eq!(
            WeightRule::new(10, -10),
            Err(RuleError::InvertedRange { min: 10, max: -10 })
        );
        assert_eq!(
            WeightRule::new(0, 10_001),
            Err(RuleError::WeightOutOfRange(10_001))
        );
        assert_eq!(checked_weight(40_000), Err(RuleError::WeightOutOfRange(40_000)));
    }
}
