//! Restricts votes by who has already voted on the target post.

use serde::{Deserialize, Serialize};
use wise_types::AccountName;

use crate::{ContextError, ValidationContext, Verdict, VoteOrder};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VotersMode {
    /// At least one listed account has voted.
    Allow,
    /// No listed account has voted.
    Deny,
    /// Every listed account has voted.
    All,
    /// Exactly one listed account has voted.
    One,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VotersRule {
    pub mode: VotersMode,
    pub usernames: Vec<AccountName>,
}

impl VotersRule {
    pub fn new(mode: VotersMode, usernames: Vec<AccountName>) -> Self {
        Self { mode, usernames }
    }

    pub async fn validate(
        &self,
        order: &VoteOrder,
        ctx: &dyn ValidationContext,
    ) -> Result<Verdict, ContextError> {
        let post = ctx.post(&order.author, &order.permlink).await?;
        let voted = self
            .usernames
            .iter()
            .filter(|u| post.active_voters.contains(*u))
            .count();

        let verdict = match self.mode {
            VotersMode::Allow => Verdict::check(voted > 0, || {
                "None of the required voters voted for this post".to_string()
            }),
            VotersMode::Deny => Verdict::check(voted == 0, || {
                "Some of the denied voters have voted for this post".to_string()
            }),
            VotersMode::All => Verdict::check(voted == self.usernames.len(), || {
                format!(
                    "Only {voted} of {} required voters voted for this post",
                    self.usernames.len()
                )
            }),
            VotersMode::One => Verdict::check(voted == 1, || {
                format!("Exactly one of the listed voters must vote, {voted} did")
            }),
        };
        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{post, MockContext};

    async fn judge(mode: VotersMode, names: &[&str]) -> Verdict {
        // voters: alice, bob
        let ctx = MockContext::new().with_post(post("author", "p"));
        let order = VoteOrder::new("r", "author", "p", 100);
        let names = names.iter().map(|s| s.to_string()).collect();
        VotersRule::new(mode, names)
            .validate(&order, &ctx)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn allow_and_deny_are_membership_checks() {
        assert!(judge(VotersMode::Allow, &["alice", "carol"]).await.is_accept());
        assert!(!judge(VotersMode::Allow, &["carol"]).await.is_accept());
        assert!(judge(VotersMode::Deny, &["carol"]).await.is_accept());
        assert!(!judge(VotersMode::Deny, &["bob"]).await.is_accept());
    }

    #[tokio::test]
    async fn all_and_one() {
        assert!(judge(VotersMode::All, &["alice", "bob"]).await.is_accept());
        assert!(!judge(VotersMode::All, &["alice", "carol"]).await.is_accept());
        assert!(judge(VotersMode::One, &["alice", "carol"]).await.is_accept());
        assert!(!judge(VotersMode::One, &["alice", "bob"]).await.is_accept());
    }
}
