//! WISE wire protocol: the operation model, versioned codec and ruleset
//! resolution.
//!
//! Operations travel as `custom_json` operations with id `"wise"`. Each
//! protocol version is a [`ProtocolVersionHandler`] activated from a fixed
//! block height; [`Protocol`] picks the right one for a transaction.

pub mod authorization;
pub mod error;
pub mod handler;
pub mod operation;
pub mod protocol;
pub mod v2;

pub use authorization::{effective_ruleset, latest_rulesets, select_ruleset, RulesetScope};
pub use error::ProtocolError;
pub use handler::ProtocolVersionHandler;
pub use operation::{Command, ConfirmVote, EffectuatedOperation, EffectuatedSetRules, SetRules};
pub use protocol::Protocol;
pub use v2::V2Handler;

/// `custom_json` id every WISE operation carries.
pub const CUSTOM_JSON_ID: &str = "wise";
