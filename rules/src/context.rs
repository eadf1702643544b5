//! The read-only collaborator rules consult.

use async_trait::async_trait;
use serde::Serialize;
use wise_types::{AccountInfo, AccountName, BlogEntry, Moment, Post, Timestamp, VoteOperation};

use crate::custom_rpc::CustomRpcRule;
use crate::rule::Verdict;
use crate::voteorder::VoteOrder;
use crate::ContextError;

/// A confirmation the delegator already published on chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmationRecord {
    pub moment: Moment,
    pub timestamp: Timestamp,
    pub voteorder_tx_id: String,
    pub accepted: bool,
    /// The vote cast in the same transaction, if any.
    pub vote: Option<VoteOperation>,
}

impl ConfirmationRecord {
    /// Accepted and bound to a literal cast vote.
    pub fn cast_vote(&self) -> Option<&VoteOperation> {
        if self.accepted {
            self.vote.as_ref()
        } else {
            None
        }
    }
}

/// Request body sent to a custom RPC endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CustomRpcCall {
    pub delegator: AccountName,
    pub voter: AccountName,
    pub voteorder: VoteOrder,
}

/// Everything a rule may look at besides the order itself.
///
/// Implementations must not mutate chain state; evaluating the same order
/// against the same context twice yields the same verdict.
#[async_trait]
pub trait ValidationContext: Send + Sync {
    fn delegator(&self) -> &str;

    fn voter(&self) -> &str;

    /// The instant the order is judged at.
    fn now(&self) -> Timestamp;

    /// Id of the transaction that carried the order being judged.
    fn voteorder_tx_id(&self) -> &str;

    async fn post(&self, author: &str, permlink: &str) -> Result<Post, ContextError>;

    async fn account(&self, name: &str) -> Result<AccountInfo, ContextError>;

    /// A page of `account`'s blog, newest entry first, skipping the
    /// `start_from` newest entries.
    async fn blog_entries(
        &self,
        account: &str,
        start_from: u32,
        limit: u32,
    ) -> Result<Vec<BlogEntry>, ContextError>;

    /// Confirmations published by `delegator` at or after `since`.
    async fn confirmations_since(
        &self,
        delegator: &str,
        since: Timestamp,
    ) -> Result<Vec<ConfirmationRecord>, ContextError>;

    /// Ask an external endpoint to decide on the order.
    async fn custom_rpc(
        &self,
        endpoint: &CustomRpcRule,
        call: &CustomRpcCall,
    ) -> Result<Verdict, ContextError>;
}
