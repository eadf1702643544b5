//! Total ordering of chain events.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::chain::Transaction;

/// Coordinate of an operation on the chain: (block height, transaction index
/// within the block, operation index within the transaction).
///
/// Moments compare lexicographically in field order, which is the order in
/// which the chain applied the operations. Real block heights start at 1, so
/// [`Moment::NEVER`] sorts before every real moment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Moment {
    pub block_num: u64,
    pub transaction_num: u32,
    pub operation_num: u32,
}

impl Moment {
    /// "No activity yet".
    pub const NEVER: Self = Self {
        block_num: 0,
        transaction_num: 0,
        operation_num: 0,
    };

    pub fn new(block_num: u64, transaction_num: u32, operation_num: u32) -> Self {
        Self {
            block_num,
            transaction_num,
            operation_num,
        }
    }

    /// Moment of the operation at `operation_num` inside `tx`.
    pub fn from_transaction(tx: &Transaction, operation_num: u32) -> Self {
        Self::new(tx.block_num, tx.transaction_num, operation_num)
    }

    /// First moment of a block.
    pub fn block_start(block_num: u64) -> Self {
        Self::new(block_num, 0, 0)
    }

    pub fn is_never(&self) -> bool {
        *self == Self::NEVER
    }
}

impl Default for Moment {
    fn default() -> Self {
        Self::NEVER
    }
}

impl fmt::Display for Moment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}",
            self.block_num, self.transaction_num, self.operation_num
        )
    }
}
