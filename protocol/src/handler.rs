use wise_types::{Operation, Transaction};

use crate::{Command, EffectuatedOperation, ProtocolError};

/// One version of the wire schema.
pub trait ProtocolVersionHandler: Send + Sync {
    /// Short name used in logs, e.g. `"v2"`.
    fn name(&self) -> &'static str;

    /// First block height at which this version is valid.
    fn activation_height(&self) -> u64;

    /// Decode `tx`, or `None` when it is not a WISE transaction of this
    /// version. Malformed payloads are `None` too.
    fn handle_or_reject(&self, tx: &Transaction) -> Option<Vec<EffectuatedOperation>>;

    /// Raw operations carrying `command`, the WISE marker last.
    fn encode(
        &self,
        delegator: &str,
        voter: &str,
        command: &Command,
    ) -> Result<Vec<Operation>, ProtocolError>;
}
