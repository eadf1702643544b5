//! Which ruleset governs a vote order.
//!
//! A delegator authorizes a voter by publishing `SetRules`; each new one for
//! the same (delegator, voter) pair replaces the previous snapshot. The
//! snapshot in force at a moment is the latest one published at or before it.

use std::collections::BTreeMap;

use wise_rules::Ruleset;
use wise_types::{AccountName, Moment};

use crate::{EffectuatedOperation, EffectuatedSetRules};

/// Which `SetRules` to look at. A `None` side matches any account.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RulesetScope {
    pub delegator: Option<AccountName>,
    pub voter: Option<AccountName>,
}

impl RulesetScope {
    pub fn pair(delegator: impl Into<AccountName>, voter: impl Into<AccountName>) -> Self {
        Self {
            delegator: Some(delegator.into()),
            voter: Some(voter.into()),
        }
    }

    pub fn delegator(delegator: impl Into<AccountName>) -> Self {
        Self {
            delegator: Some(delegator.into()),
            voter: None,
        }
    }

    pub fn voter(voter: impl Into<AccountName>) -> Self {
        Self {
            delegator: None,
            voter: Some(voter.into()),
        }
    }

    pub fn matches(&self, delegator: &str, voter: &str) -> bool {
        self.delegator.as_deref().map_or(true, |d| d == delegator)
            && self.voter.as_deref().map_or(true, |v| v == voter)
    }
}

/// The latest `SetRules` per (delegator, voter) pair in `scope` published at
/// or before `at`, ordered by moment.
pub fn latest_rulesets<'a>(
    ops: impl IntoIterator<Item = &'a EffectuatedOperation>,
    scope: &RulesetScope,
    at: Moment,
) -> Vec<EffectuatedSetRules> {
    let mut latest: BTreeMap<(&str, &str), &EffectuatedOperation> = BTreeMap::new();
    for op in ops {
        if op.set_rules().is_none() || op.moment > at || !scope.matches(&op.delegator, &op.voter) {
            continue;
        }
        let slot = latest
            .entry((op.delegator.as_str(), op.voter.as_str()))
            .or_insert(op);
        if op.moment > slot.moment {
            *slot = op;
        }
    }

    let mut snapshots: Vec<EffectuatedSetRules> = latest
        .into_values()
        .filter_map(EffectuatedSetRules::from_operation)
        .collect();
    snapshots.sort_by_key(|s| s.moment);
    snapshots
}

/// The snapshot governing orders from `voter` to `delegator` at `at`.
pub fn effective_ruleset<'a>(
    ops: impl IntoIterator<Item = &'a EffectuatedOperation>,
    delegator: &str,
    voter: &str,
    at: Moment,
) -> Option<EffectuatedSetRules> {
    latest_rulesets(ops, &RulesetScope::pair(delegator, voter), at)
        .into_iter()
        .next()
}

/// Pick ruleset `name` out of the effective snapshot, or the reason the
/// order has to be rejected.
pub fn select_ruleset<'a>(
    snapshot: Option<&'a EffectuatedSetRules>,
    name: &str,
) -> Result<&'a Ruleset, String> {
    let snapshot = snapshot.ok_or_else(|| "no ruleset found".to_string())?;
    snapshot
        .rules
        .ruleset(name)
        .ok_or_else(|| format!("ruleset {name} not found"))
}
