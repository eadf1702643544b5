//! Restricts votes by the tags of the target post.

use serde::{Deserialize, Serialize};

use crate::{ContextError, ValidationContext, Verdict, VoteOrder};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagsMode {
    /// Every tag of the post must be listed.
    Allow,
    /// No tag of the post may be listed.
    Deny,
    /// At least one listed tag must be on the post.
    Any,
    /// Every listed tag must be on the post.
    Require,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TagsRule {
    pub mode: TagsMode,
    pub tags: Vec<String>,
}

impl TagsRule {
    pub fn new(mode: TagsMode, tags: Vec<String>) -> Self {
        Self { mode, tags }
    }

    pub async fn validate(
        &self,
        order: &VoteOrder,
        ctx: &dyn ValidationContext,
    ) -> Result<Verdict, ContextError> {
        let post = ctx.post(&order.author, &order.permlink).await?;
        let listed = |tag: &String| self.tags.contains(tag);

        let verdict = match self.mode {
            TagsMode::Allow => match post.tags.iter().find(|t| !listed(*t)) {
                Some(tag) => Verdict::reject(format!("Tag {tag} is not on the allowed tags list")),
                None => Verdict::Accept,
            },
            TagsMode::Deny => match post.tags.iter().find(|t| listed(*t)) {
                Some(tag) => Verdict::reject(format!("Forbidden tag: {tag}")),
                None => Verdict::Accept,
            },
            TagsMode::Any => Verdict::check(post.tags.iter().any(listed), || {
                format!("Post has none of the tags [{}]", self.tags.join(", "))
            }),
            TagsMode::Require => match self.tags.iter().find(|t| !post.tags.contains(*t)) {
                Some(tag) => Verdict::reject(format!("Post is missing required tag {tag}")),
                None => Verdict::Accept,
            },
        };
        Ok(verdict)
    }
}
