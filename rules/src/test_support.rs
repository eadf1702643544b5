//! In-memory validation context for rule tests.

use async_trait::async_trait;
use wise_types::{AccountInfo, Asset, BlogEntry, Post, Timestamp};

use crate::{
    ConfirmationRecord, ContextError, CustomRpcCall, CustomRpcRule, ValidationContext, Verdict,
};

pub struct MockContext {
    pub delegator: String,
    pub voter: String,
    pub voteorder_tx_id: String,
    pub now: Timestamp,
    pub posts: Vec<Post>,
    pub accounts: Vec<AccountInfo>,
    /// Per-blog entries, oldest first (entry_id == index).
    pub blog: Vec<BlogEntry>,
    pub confirmations: Vec<ConfirmationRecord>,
    pub rpc_verdict: Result<Verdict, ContextError>,
}

impl MockContext {
    pub fn new() -> Self {
        Self {
            delegator: "delegator".into(),
            voter: "voter".into(),
            voteorder_tx_id: "voteorder-tx".into(),
            now: Timestamp::new(1_600_000_000),
            posts: Vec::new(),
            accounts: Vec::new(),
            blog: Vec::new(),
            confirmations: Vec::new(),
            rpc_verdict: Ok(Verdict::Accept),
        }
    }

    pub fn with_post(mut self, post: Post) -> Self {
        self.posts.push(post);
        self
    }

    /// Append `count` entries to `blog`, authored by the blog itself.
    pub fn with_blog(mut self, blog: &str, count: u32) -> Self {
        for i in 0..count {
            self.blog.push(BlogEntry {
                blog: blog.into(),
                entry_id: i,
                author: blog.into(),
                permlink: format!("post-{i}"),
            });
        }
        self
    }
}

pub fn post(author: &str, permlink: &str) -> Post {
    Post {
        author: author.into(),
        permlink: permlink.into(),
        created: Timestamp::new(1_600_000_000 - 3600),
        tags: vec!["steemit".into(), "blog".into()],
        active_voters: vec!["alice".into(), "bob".into()],
        payout: Asset::new(1500, "SBD"),
    }
}

#[async_trait]
impl ValidationContext for MockContext {
    fn delegator(&self) -> &str {
        &self.delegator
    }

    fn voter(&self) -> &str {
        &self.voter
    }

    fn now(&self) -> Timestamp {
        self.now
    }

    fn voteorder_tx_id(&self) -> &str {
        &self.voteorder_tx_id
    }

    async fn post(&self, author: &str, permlink: &str) -> Result<Post, ContextError> {
        self.posts
            .iter()
            .find(|p| p.author == author && p.permlink == permlink)
            .cloned()
            .ok_or_else(|| ContextError::NotFound(format!("post @{author}/{permlink}")))
    }

    async fn account(&self, name: &str) -> Result<AccountInfo, ContextError> {
        self.accounts
            .iter()
            .find(|a| a.name == name)
            .cloned()
            .ok_or_else(|| ContextError::NotFound(format!("account {name}")))
    }

    async fn blog_entries(
        &self,
        account: &str,
        start_from: u32,
        limit: u32,
    ) -> Result<Vec<BlogEntry>, ContextError> {
        Ok(self
            .blog
            .iter()
            .rev()
            .filter(|e| e.blog == account)
            .skip(start_from as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn confirmations_since(
        &self,
        _delegator: &str,
        since: Timestamp,
    ) -> Result<Vec<ConfirmationRecord>, ContextError> {
        Ok(self
            .confirmations
            .iter()
            .filter(|c| c.timestamp >= since)
            .cloned()
            .collect())
    }

    async fn custom_rpc(
        &self,
        _endpoint: &CustomRpcRule,
        _call: &CustomRpcCall,
    ) -> Result<Verdict, ContextError> {
        self.rpc_verdict.clone()
    }
}
