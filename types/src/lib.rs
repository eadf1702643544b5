//! Fundamental types for the WISE delegated voting protocol.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! chain coordinates ([`Moment`]), timestamps, the raw chain primitives that the
//! protocol codec reads and writes, and the content records rules inspect.

pub mod chain;
pub mod content;
pub mod error;
pub mod moment;
pub mod time;

pub use chain::{Block, CustomJsonOperation, Operation, Transaction, VoteOperation};
pub use content::{AccountInfo, Asset, BlogEntry, Post};
pub use error::WiseError;
pub use moment::Moment;
pub use time::Timestamp;

/// Chain account name (e.g. `"noisy"`).
pub type AccountName = String;

/// Highest absolute vote weight accepted by the chain (100.00%).
pub const MAX_VOTE_WEIGHT: i16 = 10_000;
