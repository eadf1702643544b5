//! Passes only for the author's very first blog post.

use serde::{Deserialize, Serialize};

use crate::{ContextError, ValidationContext, Verdict, VoteOrder};

/// How many of the newest blog entries are fetched. An author with a longer
/// blog cannot be proven to be on their first post and is rejected.
pub const FIRST_POST_HORIZON: u32 = 250;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FirstPostRule {}

impl FirstPostRule {
    pub async fn validate(
        &self,
        order: &VoteOrder,
        ctx: &dyn ValidationContext,
    ) -> Result<Verdict, ContextError> {
        let entries = ctx
            .blog_entries(&order.author, 0, FIRST_POST_HORIZON)
            .await?;
        let Some(oldest) = entries.last() else {
            return Ok(Verdict::reject(format!("@{} has no posts", order.author)));
        };
        if oldest.entry_id != 0 {
            return Ok(Verdict::reject(format!(
                "@{} has more than {FIRST_POST_HORIZON} posts",
                order.author
            )));
        }
        Ok(Verdict::check(
            oldest.author == order.author && oldest.permlink == order.permlink,
            || "This is not the first post of the author".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockContext;

    async fn judge(ctx: &MockContext, permlink: &str) -> Verdict {
        let order = VoteOrder::new("r", "author", permlink, 100);
        FirstPostRule {}.validate(&order, ctx).await.unwrap()
    }

    #[tokio::test]
    async fn accepts_the_oldest_entry_within_the_horizon() {
        let ctx = MockContext::new().with_blog("author", FIRST_POST_HORIZON);
        assert!(judge(&ctx, "post-0").await.is_accept());
    }

    #[tokio::test]
    async fn rejects_any_later_entry() {
        let ctx = MockContext::new().with_blog("author", 3);
        assert_eq!(
            judge(&ctx, "post-1").await,
            Verdict::reject("This is not the first post of the author")
        );
    }

    #[tokio::test]
    async fn rejects_beyond_the_horizon() {
        let ctx = MockContext::new().with_blog("author", FIRST_POST_HORIZON + 1);
        assert_eq!(
            judge(&ctx, "post-0").await,
            Verdict::reject("@author has more than 250 posts")
        );
    }

    #[tokio::test]
    async fn rejects_an_empty_blog() {
        let ctx = MockContext::new();
        assert!(!judge(&ctx, "post-0").await.is_accept());
    }
}
