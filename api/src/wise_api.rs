//! Protocol-aware view of a chain [`Api`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info};
use wise_protocol::{
    latest_rulesets, Command, EffectuatedOperation, EffectuatedSetRules, Protocol, RulesetScope,
};
use wise_rules::ConfirmationRecord;
use wise_types::{Block, Moment, Timestamp};

use crate::{Api, ApiError, ApiValidationContext, CustomRpcClient, HttpCustomRpc};

pub struct WiseApi<A> {
    api: Arc<A>,
    protocol: Protocol,
    custom_rpc: Arc<dyn CustomRpcClient>,
    send_enabled: AtomicBool,
}

impl<A: Api> WiseApi<A> {
    /// Wrap `api` with sending disabled.
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            protocol: Protocol::new(),
            custom_rpc: Arc::new(HttpCustomRpc::new()),
            send_enabled: AtomicBool::new(false),
        }
    }

    pub fn with_custom_rpc(mut self, client: Arc<dyn CustomRpcClient>) -> Self {
        self.custom_rpc = client;
        self
    }

    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn protocol(&self) -> &Protocol {
        &self.protocol
    }

    pub(crate) fn custom_rpc(&self) -> &dyn CustomRpcClient {
        self.custom_rpc.as_ref()
    }

    pub fn send_enabled(&self) -> bool {
        self.send_enabled.load(Ordering::Relaxed)
    }

    /// Global dry-run switch. While disabled, [`WiseApi::submit`] never
    /// touches the chain.
    pub fn set_send_enabled(&self, enabled: bool) {
        self.send_enabled.store(enabled, Ordering::Relaxed);
    }

    pub async fn get_block(&self, height: u64) -> Result<Option<Block>, ApiError> {
        self.api.get_block(height).await
    }

    /// WISE operations in `block` addressed to or sent by `delegator`.
    pub fn operations_for_delegator(&self, block: &Block, delegator: &str) -> Vec<EffectuatedOperation> {
        self.protocol
            .decode_all(&block.transactions)
            .into_iter()
            .filter(|op| op.delegator == delegator)
            .collect()
    }

    /// WISE operations involving `account` as delegator or voter, at or
    /// after `since`, oldest first.
    pub async fn wise_operations(
        &self,
        account: &str,
        since: Moment,
    ) -> Result<Vec<EffectuatedOperation>, ApiError> {
        let history = self.api.account_history(account).await?;
        let mut ops: Vec<EffectuatedOperation> = self
            .protocol
            .decode_all(&history)
            .into_iter()
            .filter(|op| op.moment >= since && (op.delegator == account || op.voter == account))
            .collect();
        ops.sort_by_key(|op| op.moment);
        Ok(ops)
    }

    /// Latest `SetRules` per pair in `scope` published at or before `at`.
    pub async fn load_rulesets(
        &self,
        scope: &RulesetScope,
        at: Moment,
    ) -> Result<Vec<EffectuatedSetRules>, ApiError> {
        let account = scope
            .delegator
            .as_deref()
            .or(scope.voter.as_deref())
            .ok_or(ApiError::EmptyScope)?;
        let ops = self.wise_operations(account, Moment::NEVER).await?;
        Ok(latest_rulesets(&ops, scope, at))
    }

    pub async fn effective_ruleset(
        &self,
        delegator: &str,
        voter: &str,
        at: Moment,
    ) -> Result<Option<EffectuatedSetRules>, ApiError> {
        let scope = RulesetScope::pair(delegator, voter);
        Ok(self.load_rulesets(&scope, at).await?.into_iter().next())
    }

    /// `delegator`'s own published confirmations, oldest first.
    pub async fn confirmations(&self, delegator: &str) -> Result<Vec<EffectuatedOperation>, ApiError> {
        Ok(self
            .wise_operations(delegator, Moment::NEVER)
            .await?
            .into_iter()
            .filter(|op| op.delegator == delegator && op.confirm_vote().is_some())
            .collect())
    }

    /// Moment of the latest confirmation `delegator` published, or
    /// [`Moment::NEVER`].
    pub async fn last_confirmation_moment(&self, delegator: &str) -> Result<Moment, ApiError> {
        Ok(self
            .confirmations(delegator)
            .await?
            .iter()
            .map(|op| op.moment)
            .max()
            .unwrap_or(Moment::NEVER))
    }

    pub async fn confirmations_since(
        &self,
        delegator: &str,
        since: Timestamp,
    ) -> Result<Vec<ConfirmationRecord>, ApiError> {
        Ok(self
            .confirmations(delegator)
            .await?
            .into_iter()
            .filter(|op| op.timestamp >= since)
            .filter_map(|op| {
                let confirm = op.confirm_vote()?.clone();
                Some(ConfirmationRecord {
                    moment: op.moment,
                    timestamp: op.timestamp,
                    voteorder_tx_id: confirm.voteorder_tx_id,
                    accepted: confirm.accepted,
                    vote: confirm.vote,
                })
            })
            .collect())
    }

    /// Encode and broadcast `command`.
    ///
    /// Encoding always happens, so a command that fails schema validation
    /// is an error even in dry-run mode. With sending disabled the result is
    /// [`Moment::NEVER`].
    pub async fn submit(
        &self,
        delegator: &str,
        voter: &str,
        command: &Command,
    ) -> Result<Moment, ApiError> {
        let ops = self.protocol.encode(delegator, voter, command)?;
        if !self.send_enabled() {
            debug!(command = command.name(), %delegator, %voter, "sending disabled, not broadcasting");
            return Ok(Moment::NEVER);
        }
        let moment = self.api.send_to_blockchain(ops).await?;
        info!(command = command.name(), %delegator, %voter, %moment, backend = self.api.name(), "broadcast");
        Ok(moment)
    }

    /// Rule context judging orders from `voter` to `delegator` as of `now`.
    pub fn validation_context<'a>(
        &'a self,
        delegator: &'a str,
        voter: &'a str,
        voteorder_tx_id: &'a str,
        now: Timestamp,
    ) -> ApiValidationContext<'a, A> {
        ApiValidationContext::new(self, delegator, voter, voteorder_tx_id, now)
    }
}
