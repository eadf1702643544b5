//! Recorded chain content for seeding a [`FakeApi`](crate::FakeApi).

use serde::{Deserialize, Serialize};
use wise_types::{AccountInfo, BlogEntry, Post, Transaction};

/// JSON document describing a slice of chain state.
///
/// `head` defaults to the highest block any transaction sits in.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Dataset {
    #[serde(default)]
    pub head: Option<u64>,
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(default)]
    pub accounts: Vec<AccountInfo>,
    /// Blog entries, oldest first per blog.
    #[serde(default)]
    pub blog_entries: Vec<BlogEntry>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Dataset {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
