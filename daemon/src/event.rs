//! Lifecycle and progress events emitted by the synchronizer.

use wise_types::Moment;

#[derive(Clone, Debug, PartialEq)]
pub enum DaemonEvent {
    /// Scanning begins at `from_height`.
    Started { delegator: String, from_height: u64 },
    /// Every vote order in the block was answered. Emitted once per block,
    /// in block order.
    BlockProcessed { height: u64 },
    /// A confirmation for the order at `voteorder` was submitted.
    /// `confirmed_at` is [`Moment::NEVER`] in dry-run mode.
    OperationConfirmed {
        voteorder: Moment,
        voteorder_tx_id: String,
        voter: String,
        accepted: bool,
        message: String,
        confirmed_at: Moment,
    },
    /// Stopped on request or after `stop_at_height`; `next_height` is where
    /// a later run would continue.
    Stopped { next_height: u64 },
    Failed { height: u64, error: String },
}

impl DaemonEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stopped { .. } | Self::Failed { .. })
    }
}
