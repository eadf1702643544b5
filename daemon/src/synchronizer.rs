//! The per-delegator block follower.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace};
use wise_api::{Api, HttpCustomRpc, WiseApi};
use wise_protocol::{select_ruleset, Command, ConfirmVote, EffectuatedOperation};
use wise_rules::{Verdict, VoteOrder};
use wise_types::{Block, VoteOperation};

use crate::{DaemonConfig, DaemonError, DaemonEvent};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DaemonState {
    Idle,
    Running,
    Stopped,
    Failed,
}

/// Answers vote orders addressed to one delegator, block by block.
///
/// Blocks are processed strictly in height order. A block that is not
/// produced yet is asked for again after `block_retry_delay`.
pub struct Synchronizer<A> {
    wise: Arc<WiseApi<A>>,
    delegator: String,
    start_height: u64,
    retry_delay: Duration,
    stop_at_height: Option<u64>,
    state: DaemonState,
    events: mpsc::Sender<DaemonEvent>,
}

impl<A: Api + 'static> Synchronizer<A> {
    /// Synchronizer over an already wired [`WiseApi`]. The returned receiver
    /// yields the run's events; dropping it does not affect the run.
    ///
    /// The channel holds `event_buffer` events. A receiver that is kept but
    /// never read pauses the run once the buffer is full, until it is read
    /// or dropped.
    pub fn new(
        wise: Arc<WiseApi<A>>,
        config: &DaemonConfig,
    ) -> Result<(Self, mpsc::Receiver<DaemonEvent>), DaemonError> {
        config.validate()?;
        let (events, rx) = mpsc::channel(config.event_buffer);
        let sync = Self {
            wise,
            delegator: config.delegator.clone(),
            start_height: config.start_height,
            retry_delay: config.block_retry_delay(),
            stop_at_height: config.stop_at_height,
            state: DaemonState::Idle,
            events,
        };
        Ok((sync, rx))
    }

    /// Wrap `api` the way `config` asks: send switch and HTTP custom RPC
    /// client with the configured timeout.
    pub fn from_config(
        api: Arc<A>,
        config: &DaemonConfig,
    ) -> Result<(Self, mpsc::Receiver<DaemonEvent>), DaemonError> {
        let wise = WiseApi::new(api)
            .with_custom_rpc(Arc::new(HttpCustomRpc::with_timeout(config.custom_rpc_timeout())));
        wise.set_send_enabled(config.send_enabled);
        Self::new(Arc::new(wise), config)
    }

    pub fn state(&self) -> DaemonState {
        self.state
    }

    pub fn delegator(&self) -> &str {
        &self.delegator
    }

    pub fn wise(&self) -> &WiseApi<A> {
        &self.wise
    }

    /// First height to scan: right after the delegator's latest confirmation,
    /// or the configured start height if that is later.
    pub async fn resume_height(&self) -> Result<u64, DaemonError> {
        let last = self.wise.last_confirmation_moment(&self.delegator).await?;
        let after_last = if last.is_never() {
            0
        } else {
            last.block_num + 1
        };
        Ok(self.start_height.max(after_last).max(1))
    }

    /// Run until stopped, until `stop_at_height` is processed, or until an
    /// error. The terminal event is emitted before returning.
    pub async fn run(&mut self, mut stop: watch::Receiver<bool>) -> Result<(), DaemonError> {
        if self.state != DaemonState::Idle {
            return Err(DaemonError::AlreadyStarted);
        }
        self.state = DaemonState::Running;

        let mut height = 0;
        let result = self.follow(&mut height, &mut stop).await;
        match &result {
            Ok(()) => {
                self.state = DaemonState::Stopped;
                info!(delegator = %self.delegator, next_height = height, "synchronizer stopped");
                self.emit(DaemonEvent::Stopped {
                    next_height: height,
                })
                .await;
            }
            Err(e) => {
                self.state = DaemonState::Failed;
                error!(delegator = %self.delegator, height, error = %e, "synchronizer failed");
                self.emit(DaemonEvent::Failed {
                    height,
                    error: e.to_string(),
                })
                .await;
            }
        }
        result
    }

    /// Run on a tokio task.
    pub fn spawn(mut self, stop: watch::Receiver<bool>) -> JoinHandle<(Self, Result<(), DaemonError>)> {
        tokio::spawn(async move {
            let result = self.run(stop).await;
            (self, result)
        })
    }

    async fn follow(
        &self,
        height: &mut u64,
        stop: &mut watch::Receiver<bool>,
    ) -> Result<(), DaemonError> {
        *height = self.resume_height().await?;
        info!(delegator = %self.delegator, height = *height, "synchronizer started");
        self.emit(DaemonEvent::Started {
            delegator: self.delegator.clone(),
            from_height: *height,
        })
        .await;

        loop {
            if *stop.borrow() {
                return Ok(());
            }
            if self.stop_at_height.is_some_and(|last| *height > last) {
                return Ok(());
            }

            let Some(block) = self.wise.get_block(*height).await? else {
                trace!(height = *height, "block not produced yet");
                tokio::select! {
                    _ = tokio::time::sleep(self.retry_delay) => {}
                    changed = stop.changed() => {
                        if changed.is_err() {
                            // stop handle dropped
                            tokio::time::sleep(self.retry_delay).await;
                        }
                    }
                }
                continue;
            };

            self.process_block(&block).await?;
            self.emit(DaemonEvent::BlockProcessed { height: *height }).await;
            *height += 1;
        }
    }

    async fn process_block(&self, block: &Block) -> Result<(), DaemonError> {
        let ops = self.wise.operations_for_delegator(block, &self.delegator);
        for op in &ops {
            if let Some(order) = op.voteorder() {
                self.answer(op, order).await?;
            }
        }
        debug!(height = block.height, wise_ops = ops.len(), "block processed");
        Ok(())
    }

    /// Judge an order and submit the confirmation, with the vote when accepted.
    async fn answer(&self, op: &EffectuatedOperation, order: &VoteOrder) -> Result<(), DaemonError> {
        let verdict = self.judge(op, order).await?;
        let confirm = match &verdict {
            Verdict::Accept => ConfirmVote::accepted(
                op.transaction_id.clone(),
                VoteOperation {
                    voter: self.delegator.clone(),
                    author: order.author.clone(),
                    permlink: order.permlink.clone(),
                    weight: order.weight,
                },
            ),
            Verdict::Reject(reason) => ConfirmVote::rejected(op.transaction_id.clone(), reason.clone()),
        };
        let accepted = confirm.accepted;
        let message = confirm.message.clone();

        let confirmed_at = self
            .wise
            .submit(&self.delegator, &op.voter, &Command::ConfirmVote(confirm))
            .await?;
        info!(
            delegator = %self.delegator,
            voter = %op.voter,
            tx_id = %op.transaction_id,
            moment = %op.moment,
            accepted,
            %message,
            "voteorder answered"
        );
        self.emit(DaemonEvent::OperationConfirmed {
            voteorder: op.moment,
            voteorder_tx_id: op.transaction_id.clone(),
            voter: op.voter.clone(),
            accepted,
            message,
            confirmed_at,
        })
        .await;
        Ok(())
    }

    async fn judge(&self, op: &EffectuatedOperation, order: &VoteOrder) -> Result<Verdict, DaemonError> {
        let snapshot = self
            .wise
            .effective_ruleset(&self.delegator, &op.voter, op.moment)
            .await?;
        let ruleset = match select_ruleset(snapshot.as_ref(), &order.ruleset_name) {
            Ok(ruleset) => ruleset,
            Err(reason) => return Ok(Verdict::Reject(reason)),
        };
        let ctx = self.wise.validation_context(
            &self.delegator,
            &op.voter,
            &op.transaction_id,
            op.timestamp,
        );
        Ok(ruleset.validate(order, &ctx).await?)
    }

    async fn emit(&self, event: DaemonEvent) {
        if self.events.send(event).await.is_err() {
            trace!("event receiver dropped");
        }
    }
}
