//! A named, ordered list of rules.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{ContextError, Rule, ValidationContext, Verdict, VoteOrder};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ruleset {
    pub name: String,
    pub rules: Vec<Rule>,
}

impl Ruleset {
    pub fn new(name: impl Into<String>, rules: Vec<Rule>) -> Self {
        Self {
            name: name.into(),
            rules,
        }
    }

    /// Run every rule in declared order, stopping at the first rejection.
    ///
    /// A context lookup that finds nothing (missing post, unknown account)
    /// rejects the order. Any other context failure is returned as an error.
    pub async fn validate(
        &self,
        order: &VoteOrder,
        ctx: &dyn ValidationContext,
    ) -> Result<Verdict, ContextError> {
        for rule in &self.rules {
            let verdict = match rule.validate(order, ctx).await {
                Ok(verdict) => verdict,
                Err(ContextError::NotFound(what)) => Verdict::Reject(format!("{what} does not exist")),
                Err(e) => return Err(e),
            };
            if let Verdict::Reject(reason) = &verdict {
                debug!(ruleset = %self.name, rule = %rule.kind(), %reason, "voteorder rejected");
                return Ok(verdict);
            }
        }
        Ok(Verdict::Accept)
    }
}
