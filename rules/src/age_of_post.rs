//! Restricts votes by how old the target post is.

use serde::{Deserialize, Serialize};

use crate::{ContextError, TimeUnit, ValidationContext, Verdict, VoteOrder};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeMode {
    OlderThan,
    YoungerThan,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgeOfPostRule {
    pub mode: AgeMode,
    pub value: u64,
    pub unit: TimeUnit,
}

impl AgeOfPostRule {
    pub fn new(mode: AgeMode, value: u64, unit: TimeUnit) -> Self {
        Self { mode, value, unit }
    }

    pub async fn validate(
        &self,
        order: &VoteOrder,
        ctx: &dyn ValidationContext,
    ) -> Result<Verdict, ContextError> {
        let post = ctx.post(&order.author, &order.permlink).await?;
        let age = post.created.elapsed_since(ctx.now());
        let limit = self.unit.to_seconds(self.value);

        let verdict = match self.mode {
            AgeMode::OlderThan => Verdict::check(age > limit, || {
                format!("Post is younger than {} {}(s)", self.value, self.unit.as_str())
            }),
            AgeMode::YoungerThan => Verdict::check(age < limit, || {
                format!("Post is older than {} {}(s)", self.value, self.unit.as_str())
            }),
        };
        Ok(verdict)
    }
}
