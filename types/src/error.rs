//! Top-level error type shared across crates.

use thiserror::Error;

/// Errors raised while parsing or constructing fundamental types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WiseError {
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("invalid asset: {0}")]
    InvalidAsset(String),

    #[error("{0}")]
    Other(String),
}
