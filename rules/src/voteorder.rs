//! The request a voter sends to a delegator.

use serde::{Deserialize, Serialize};
use wise_types::AccountName;

/// A voter's request to cast a vote of `weight` on `@author/permlink`
/// under the delegator's ruleset named `ruleset_name`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoteOrder {
    pub ruleset_name: String,
    pub author: AccountName,
    pub permlink: String,
    /// Signed weight in basis points: negative flags, positive upvotes.
    pub weight: i16,
}

impl VoteOrder {
    pub fn new(
        ruleset_name: impl Into<String>,
        author: impl Into<AccountName>,
        permlink: impl Into<String>,
        weight: i16,
    ) -> Self {
        Self {
            ruleset_name: ruleset_name.into(),
            author: author.into(),
            permlink: permlink.into(),
            weight,
        }
    }

    pub fn is_flag(&self) -> bool {
        self.weight < 0
    }
}
