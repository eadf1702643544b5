//! Nullable chain: an in-memory [`Api`] for testing.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;
use wise_api::{Api, ApiError};
use wise_protocol::Protocol;
use wise_types::{AccountInfo, Block, BlogEntry, Moment, Operation, Post, Timestamp, Transaction};

use crate::{Dataset, NullClock};

/// Seconds between two produced blocks.
pub const BLOCK_INTERVAL_SECS: u64 = 3;

/// An in-memory chain. Thread-safe for use with tokio's multi-threaded
/// runtime.
///
/// Blocks up to `head` exist; a height without recorded transactions yields
/// an empty block. Broadcasts are recorded and appended as a new head block.
pub struct FakeApi {
    state: Mutex<ChainState>,
    clock: NullClock,
    protocol: Protocol,
}

#[derive(Default)]
struct ChainState {
    head: u64,
    blocks: BTreeMap<u64, Vec<Transaction>>,
    posts: Vec<Post>,
    accounts: Vec<AccountInfo>,
    /// Oldest first.
    blog_entries: Vec<BlogEntry>,
    pushed: Vec<Transaction>,
    block_requests: Vec<u64>,
    fail_sends: bool,
}

impl FakeApi {
    /// An empty chain whose head is at `head`, with the clock at block
    /// `head`'s time.
    pub fn new(head: u64) -> Self {
        Self {
            state: Mutex::new(ChainState {
                head,
                ..ChainState::default()
            }),
            clock: NullClock::new(head * BLOCK_INTERVAL_SECS),
            protocol: Protocol::new(),
        }
    }

    pub fn from_dataset(dataset: Dataset) -> Self {
        let tx_head = dataset.transactions.iter().map(|tx| tx.block_num).max();
        let head = dataset.head.unwrap_or(0).max(tx_head.unwrap_or(0));
        let api = Self::new(head);
        {
            let mut state = api.state.lock().unwrap();
            state.posts = dataset.posts;
            state.accounts = dataset.accounts;
            state.blog_entries = dataset.blog_entries;
            for tx in dataset.transactions {
                state.blocks.entry(tx.block_num).or_default().push(tx);
            }
            for txs in state.blocks.values_mut() {
                txs.sort_by_key(|tx| tx.transaction_num);
            }
        }
        api
    }

    pub fn clock(&self) -> &NullClock {
        &self.clock
    }

    pub fn head(&self) -> u64 {
        self.state.lock().unwrap().head
    }

    /// Produce empty blocks up to `head`.
    pub fn set_head(&self, head: u64) {
        let mut state = self.state.lock().unwrap();
        state.head = state.head.max(head);
    }

    /// Append a transaction carrying `ops` to block `height` and return the
    /// moment of its last operation. Moves the head up if needed.
    pub fn push_transaction(&self, height: u64, ops: Vec<Operation>) -> Moment {
        let mut state = self.state.lock().unwrap();
        state.head = state.head.max(height);
        let txs = state.blocks.entry(height).or_default();
        let tx = Transaction {
            block_num: height,
            transaction_num: txs.len() as u32,
            transaction_id: format!("{height:08x}{:04x}", txs.len()),
            timestamp: block_time(height),
            ops,
        };
        let moment = Moment::from_transaction(&tx, tx.ops.len().saturating_sub(1) as u32);
        txs.push(tx);
        moment
    }

    pub fn add_post(&self, post: Post) {
        self.state.lock().unwrap().posts.push(post);
    }

    pub fn add_account(&self, account: AccountInfo) {
        self.state.lock().unwrap().accounts.push(account);
    }

    /// Append a post to the end of `blog`.
    pub fn add_blog_entry(&self, blog: &str, author: &str, permlink: &str) {
        let mut state = self.state.lock().unwrap();
        let entry_id = state.blog_entries.iter().filter(|e| e.blog == blog).count() as u32;
        state.blog_entries.push(BlogEntry {
            blog: blog.into(),
            entry_id,
            author: author.into(),
            permlink: permlink.into(),
        });
    }

    /// Make every following broadcast fail.
    pub fn fail_sends(&self, fail: bool) {
        self.state.lock().unwrap().fail_sends = fail;
    }

    /// Transactions broadcast through [`Api::send_to_blockchain`].
    pub fn pushed(&self) -> Vec<Transaction> {
        self.state.lock().unwrap().pushed.clone()
    }

    /// Every height passed to [`Api::get_block`], in call order.
    pub fn block_requests(&self) -> Vec<u64> {
        self.state.lock().unwrap().block_requests.clone()
    }

    fn names(&self, tx: &Transaction, account: &str) -> bool {
        tx.involves(account)
            || self.protocol.handle_or_reject(tx).is_some_and(|ops| {
                ops.iter()
                    .any(|op| op.delegator == account || op.voter == account)
            })
    }
}

fn block_time(height: u64) -> Timestamp {
    Timestamp::new(height * BLOCK_INTERVAL_SECS)
}

#[async_trait]
impl Api for FakeApi {
    fn name(&self) -> &str {
        "fake"
    }

    async fn get_block(&self, height: u64) -> Result<Option<Block>, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.block_requests.push(height);
        if height == 0 || height > state.head {
            return Ok(None);
        }
        Ok(Some(Block {
            height,
            timestamp: block_time(height),
            transactions: state.blocks.get(&height).cloned().unwrap_or_default(),
        }))
    }

    async fn send_to_blockchain(&self, ops: Vec<Operation>) -> Result<Moment, ApiError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_sends {
            return Err(ApiError::SendFailed("broadcast refused by fake chain".into()));
        }
        state.head += 1;
        let height = state.head;
        let tx = Transaction {
            block_num: height,
            transaction_num: 0,
            transaction_id: format!("pushed-{}", state.pushed.len()),
            timestamp: self.clock.now().max(block_time(height)),
            ops,
        };
        let moment = Moment::from_transaction(&tx, tx.ops.len().saturating_sub(1) as u32);
        state.pushed.push(tx.clone());
        state.blocks.entry(height).or_default().push(tx);
        Ok(moment)
    }

    async fn account_history(&self, account: &str) -> Result<Vec<Transaction>, ApiError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .blocks
            .values()
            .flatten()
            .filter(|tx| self.names(tx, account))
            .cloned()
            .collect())
    }

    async fn load_post(&self, author: &str, permlink: &str) -> Result<Post, ApiError> {
        self.state
            .lock()
            .unwrap()
            .posts
            .iter()
            .find(|p| p.author == author && p.permlink == permlink)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("post @{author}/{permlink}")))
    }

    async fn get_account_info(&self, name: &str) -> Result<AccountInfo, ApiError> {
        self.state
            .lock()
            .unwrap()
            .accounts
            .iter()
            .find(|a| a.name == name)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("account {name}")))
    }

    async fn get_blog_entries(
        &self,
        account: &str,
        start_from: u32,
        limit: u32,
    ) -> Result<Vec<BlogEntry>, ApiError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .blog_entries
            .iter()
            .rev()
            .filter(|e| e.blog == account)
            .skip(start_from as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wise_types::VoteOperation;

    fn vote(voter: &str) -> Operation {
        Operation::Vote(VoteOperation {
            voter: voter.into(),
            author: "author".into(),
            permlink: "permlink".into(),
            weight: 100,
        })
    }

    #[tokio::test]
    async fn blocks_above_head_are_absent() {
        let api = FakeApi::new(10);
        assert!(api.get_block(10).await.unwrap().is_some());
        assert!(api.get_block(11).await.unwrap().is_none());
        api.set_head(11);
        assert!(api.get_block(11).await.unwrap().is_some());
        assert_eq!(api.block_requests(), vec![10, 11, 11]);
    }

    #[tokio::test]
    async fn pushed_transactions_land_in_blocks() {
        let api = FakeApi::new(5);
        let moment = api.push_transaction(7, vec![vote("a"), vote("b")]);
        assert_eq!(moment, Moment::new(7, 0, 1));
        let second = api.push_transaction(7, vec![vote("c")]);
        assert_eq!(second, Moment::new(7, 1, 0));

        let block = api.get_block(7).await.unwrap().unwrap();
        assert_eq!(block.transactions.len(), 2);
        assert_eq!(api.head(), 7);
    }

    #[tokio::test]
    async fn broadcast_appends_a_head_block() {
        let api = FakeApi::new(5);
        let moment = api.send_to_blockchain(vec![vote("a"), vote("b")]).await.unwrap();
        assert_eq!(moment, Moment::new(6, 0, 1));
        assert_eq!(api.pushed().len(), 1);
        assert_eq!(api.account_history("a").await.unwrap().len(), 1);

        api.fail_sends(true);
        assert!(api.send_to_blockchain(vec![vote("a")]).await.is_err());
    }

    #[tokio::test]
    async fn blog_entries_page_newest_first() {
        let api = FakeApi::new(1);
        for i in 0..5 {
            api.add_blog_entry("author", "author", &format!("post-{i}"));
        }
        let page = api.get_blog_entries("author", 1, 2).await.unwrap();
        let ids: Vec<u32> = page.iter().map(|e| e.entry_id).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[tokio::test]
    async fn lookups_report_not_found() {
        let api = FakeApi::new(1);
        assert!(matches!(
            api.load_post("nobody", "nothing").await,
            Err(ApiError::NotFound(_))
        ));
        assert!(matches!(
            api.get_account_info("nobody").await,
            Err(ApiError::NotFound(_))
        ));
    }
}
