//! [`ValidationContext`] backed by a [`WiseApi`].

use async_trait::async_trait;
use wise_rules::{
    ConfirmationRecord, ContextError, CustomRpcCall, CustomRpcRule, ValidationContext, Verdict,
};
use wise_types::{AccountInfo, BlogEntry, Post, Timestamp};

use crate::{Api, WiseApi};

pub struct ApiValidationContext<'a, A> {
    wise: &'a WiseApi<A>,
    delegator: &'a str,
    voter: &'a str,
    voteorder_tx_id: &'a str,
    now: Timestamp,
}

impl<'a, A: Api> ApiValidationContext<'a, A> {
    pub fn new(
        wise: &'a WiseApi<A>,
        delegator: &'a str,
        voter: &'a str,
        voteorder_tx_id: &'a str,
        now: Timestamp,
    ) -> Self {
        Self {
            wise,
            delegator,
            voter,
            voteorder_tx_id,
            now,
        }
    }
}

#[async_trait]
impl<A: Api> ValidationContext for ApiValidationContext<'_, A> {
    fn delegator(&self) -> &str {
        self.delegator
    }

    fn voter(&self) -> &str {
        self.voter
    }

    fn now(&self) -> Timestamp {
        self.now
    }

    fn voteorder_tx_id(&self) -> &str {
        self.voteorder_tx_id
    }

    async fn post(&self, author: &str, permlink: &str) -> Result<Post, ContextError> {
        Ok(self.wise.api().load_post(author, permlink).await?)
    }

    async fn account(&self, name: &str) -> Result<AccountInfo, ContextError> {
        Ok(self.wise.api().get_account_info(name).await?)
    }

    async fn blog_entries(
        &self,
        account: &str,
        start_from: u32,
        limit: u32,
    ) -> Result<Vec<BlogEntry>, ContextError> {
        Ok(self
            .wise
            .api()
            .get_blog_entries(account, start_from, limit)
            .await?)
    }

    async fn confirmations_since(
        &self,
        delegator: &str,
        since: Timestamp,
    ) -> Result<Vec<ConfirmationRecord>, ContextError> {
        Ok(self.wise.confirmations_since(delegator, since).await?)
    }

    async fn custom_rpc(
        &self,
        endpoint: &CustomRpcRule,
        call: &CustomRpcCall,
    ) -> Result<Verdict, ContextError> {
        Ok(self.wise.custom_rpc().call(endpoint, call).await?)
    }
}
