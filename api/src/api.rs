use async_trait::async_trait;
use wise_types::{AccountInfo, Block, BlogEntry, Moment, Operation, Post, Transaction};

use crate::ApiError;

/// Raw chain source and sink.
#[async_trait]
pub trait Api: Send + Sync {
    /// Backend name for logs.
    fn name(&self) -> &str;

    /// The block at `height`, or `None` if it has not been produced yet.
    async fn get_block(&self, height: u64) -> Result<Option<Block>, ApiError>;

    /// Broadcast `ops` in a single transaction. Returns the moment of the
    /// last operation once included.
    async fn send_to_blockchain(&self, ops: Vec<Operation>) -> Result<Moment, ApiError>;

    /// Every transaction `account` authorized or is named in, oldest first.
    async fn account_history(&self, account: &str) -> Result<Vec<Transaction>, ApiError>;

    async fn load_post(&self, author: &str, permlink: &str) -> Result<Post, ApiError>;

    async fn get_account_info(&self, name: &str) -> Result<AccountInfo, ApiError>;

    /// A page of `account`'s blog, newest first, skipping the `start_from`
    /// newest entries.
    async fn get_blog_entries(
        &self,
        account: &str,
        start_from: u32,
        limit: u32,
    ) -> Result<Vec<BlogEntry>, ApiError>;
}
