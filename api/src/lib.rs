//! Chain access for WISE.
//!
//! [`Api`] is the raw chain source and sink. [`WiseApi`] layers the protocol
//! on top of it: decoding WISE operations out of blocks and account history,
//! resolving rulesets, and submitting encoded commands behind a global
//! dry-run switch.

pub mod api;
pub mod context;
pub mod custom_rpc;
pub mod error;
pub mod wise_api;

pub use api::Api;
pub use context::ApiValidationContext;
pub use custom_rpc::{CustomRpcClient, HttpCustomRpc};
pub use error::ApiError;
pub use wise_api::WiseApi;
