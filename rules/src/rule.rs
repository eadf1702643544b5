//! The closed set of rule kinds and their dispatch.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{
    AgeOfPostRule, AuthorsRule, ContextError, CustomRpcRule, ExpirationDateRule, FirstPostRule,
    PayoutRule, TagsRule, ValidationContext, VoteOrder, VotersRule, VotesCountRule,
    VotingPowerRule, WeightForPeriodRule, WeightRule,
};

/// Outcome of judging an order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    /// Rejected, with a human-readable reason published in the confirmation.
    Reject(String),
}

impl Verdict {
    pub fn reject(reason: impl Into<String>) -> Self {
        Self::Reject(reason.into())
    }

    pub fn is_accept(&self) -> bool {
        matches!(self, Self::Accept)
    }

    /// Accept when `ok`, otherwise reject with the lazily built reason.
    pub fn check(ok: bool, reason: impl FnOnce() -> String) -> Self {
        if ok {
            Self::Accept
        } else {
            Self::Reject(reason())
        }
    }
}

/// A single constraint. Serialized as an object tagged by `"rule"`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Rule {
    Tags(TagsRule),
    Authors(AuthorsRule),
    Voters(VotersRule),
    Weight(WeightRule),
    VotingPower(VotingPowerRule),
    Payout(PayoutRule),
    VotesCount(VotesCountRule),
    AgeOfPost(AgeOfPostRule),
    WeightForPeriod(WeightForPeriodRule),
    FirstPost(FirstPostRule),
    CustomRpc(CustomRpcRule),
    ExpirationDate(ExpirationDateRule),
}

/// Discriminant of [`Rule`], handy for logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RuleKind {
    Tags,
    Authors,
    Voters,
    Weight,
    VotingPower,
    Payout,
    VotesCount,
    AgeOfPost,
    WeightForPeriod,
    FirstPost,
    CustomRpc,
    ExpirationDate,
}

impl RuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tags => "tags",
            Self::Authors => "authors",
            Self::Voters => "voters",
            Self::Weight => "weight",
            Self::VotingPower => "voting_power",
            Self::Payout => "payout",
            Self::VotesCount => "votes_count",
            Self::AgeOfPost => "age_of_post",
            Self::WeightForPeriod => "weight_for_period",
            Self::FirstPost => "first_post",
            Self::CustomRpc => "custom_rpc",
            Self::ExpirationDate => "expiration_date",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Rule {
    pub fn kind(&self) -> RuleKind {
        match self {
            Self::Tags(_) => RuleKind::Tags,
            Self::Authors(_) => RuleKind::Authors,
            Self::Voters(_) => RuleKind::Voters,
            Self::Weight(_) => RuleKind::Weight,
            Self::VotingPower(_) => RuleKind::VotingPower,
            Self::Payout(_) => RuleKind::Payout,
            Self::VotesCount(_) => RuleKind::VotesCount,
            Self::AgeOfPost(_) => RuleKind::AgeOfPost,
            Self::WeightForPeriod(_) => RuleKind::WeightForPeriod,
            Self::FirstPost(_) => RuleKind::FirstPost,
            Self::CustomRpc(_) => RuleKind::CustomRpc,
            Self::ExpirationDate(_) => RuleKind::ExpirationDate,
        }
    }

    /// Judge `order` against this rule.
    ///
    /// `Err` means the context could not answer, not that the order is out
    /// of scope.
    pub async fn validate(
        &self,
        order: &VoteOrder,
        ctx: &dyn ValidationContext,
    ) -> Result<Verdict, ContextError> {
        match self {
            Self::Tags(rule) => rule.validate(order, ctx).await,
            Self::Authors(rule) => Ok(rule.validate(order)),
            Self::Voters(rule) => rule.validate(order, ctx).await,
            Self::Weight(rule) => Ok(rule.validate(order)),
            Self::VotingPower(rule) => rule.validate(ctx).await,
            Self::Payout(rule) => rule.validate(order, ctx).await,
            Self::VotesCount(rule) => rule.validate(order, ctx).await,
            Self::AgeOfPost(rule) => rule.validate(order, ctx).await,
            Self::WeightForPeriod(rule) => rule.validate(order, ctx).await,
            Self::FirstPost(rule) => rule.validate(order, ctx).await,
            Self::CustomRpc(rule) => rule.validate(order, ctx).await,
            Self::ExpirationDate(rule) => Ok(rule.validate(ctx)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_tagged_rules() {
        let rules: Vec<Rule> = serde_json::from_value(json!([
            {"rule": "weight", "min": -100, "max": 50},
            {"rule": "first_post"},
            {"rule": "voting_power", "mode": "more_than", "value": 5000},
            {"rule": "expiration_date", "date": "2030-01-01T00:00:00Z"},
        ]))
        .unwrap();
        let kinds: Vec<RuleKind> = rules.iter().map(Rule::kind).collect();
        assert_eq!(
            kinds,
            vec![
                RuleKind::Weight,
                RuleKind::FirstPost,
                RuleKind::VotingPower,
                RuleKind::ExpirationDate
            ]
        );
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let res = serde_json::from_value::<Rule>(json!({"rule": "karma", "value": 1}));
        assert!(res.is_err());
    }

    #[test]
    fn unknown_field_is_rejected() {
        let res = serde_json::from_value::<Rule>(json!({"rule": "weight", "min": 0, "max": 1, "x": 2}));
        assert!(res.is_err());
    }

    #[test]
    fn invalid_field_values_are_rejected_at_construction() {
        let res = serde_json::from_value::<Rule>(json!({"rule": "weight", "min": 10, "max": -10}));
        assert!(res.is_err());
        let res = serde_json::from_value::<Rule>(json!({"rule": "weight", "min": 0, "max": 20000}));
        assert!(res.is_err());
    }

    #[test]
    fn serializes_with_tag() {
        let rule = Rule::Weight(WeightRule::new(-100, 50).unwrap());
        assert_eq!(
            serde_json::to_value(&rule).unwrap(),
            json!({"rule": "weight", "min": -100, "max": 50})
        );
        assert_eq!(rule.kind().to_string(), "weight");
    }
}
