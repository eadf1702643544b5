//! Restricts which post authors may be voted on.

use serde::{Deserialize, Serialize};
use wise_types::AccountName;

use crate::{Verdict, VoteOrder};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorsMode {
    /// Only listed authors.
    Allow,
    /// Anyone but listed authors.
    Deny,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthorsRule {
    pub mode: AuthorsMode,
    pub authors: Vec<AccountName>,
}

impl AuthorsRule {
    pub fn new(mode: AuthorsMode, authors: Vec<AccountName>) -> Self {
        Self { mode, authors }
    }

    pub fn validate(&self, order: &VoteOrder) -> Verdict {
        let listed = self.authors.iter().any(|a| *a == order.author);
        match self.mode {
            AuthorsMode::Allow => Verdict::check(listed, || {
                format!("Author of the post is not on the allowed list (@{})", order.author)
            }),
            AuthorsMode::Deny => Verdict::check(!listed, || {
                format!("Author of the post is on the denied list (@{})", order.author)
            }),
        }
    }
}
