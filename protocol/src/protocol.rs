//! Version dispatch.

use std::cmp::Reverse;

use wise_types::{Operation, Transaction};

use crate::{Command, EffectuatedOperation, ProtocolError, ProtocolVersionHandler, V2Handler};

/// All known protocol versions, newest first.
pub struct Protocol {
    handlers: Vec<Box<dyn ProtocolVersionHandler>>,
}

impl Default for Protocol {
    fn default() -> Self {
        Self::new()
    }
}

impl Protocol {
    pub fn new() -> Self {
        Self::with_handlers(vec![Box::new(V2Handler)])
    }

    pub fn with_handlers(mut handlers: Vec<Box<dyn ProtocolVersionHandler>>) -> Self {
        handlers.sort_by_key(|h| Reverse(h.activation_height()));
        Self { handlers }
    }

    pub fn handler_names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    /// Decode `tx` with the newest version active at its height, falling
    /// back to older ones. `None` means the transaction is not ours.
    pub fn handle_or_reject(&self, tx: &Transaction) -> Option<Vec<EffectuatedOperation>> {
        self.handlers
            .iter()
            .filter(|h| h.activation_height() <= tx.block_num)
            .find_map(|h| h.handle_or_reject(tx))
    }

    /// Decode every WISE operation of a block's transactions, in chain order.
    pub fn decode_all<'a>(
        &self,
        txs: impl IntoIterator<Item = &'a Transaction>,
    ) -> Vec<EffectuatedOperation> {
        txs.into_iter()
            .filter_map(|tx| self.handle_or_reject(tx))
            .flatten()
            .collect()
    }

    /// Encode with the newest version.
    pub fn encode(
        &self,
        delegator: &str,
        voter: &str,
        command: &Command,
    ) -> Result<Vec<Operation>, ProtocolError> {
        let handler = self.handlers.first().ok_or(ProtocolError::NoHandler)?;
        handler.encode(delegator, voter, command)
    }
}
