use thiserror::Error;

/// A rule definition that does not describe a valid constraint.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("weight {0} is outside -10000..=10000")]
    WeightOutOfRange(i64),

    #[error("weight range is inverted: min {min} > max {max}")]
    InvertedRange { min: i16, max: i16 },

    #[error("{rule}: {reason}")]
    InvalidValue { rule: &'static str, reason: String },

    #[error("invalid expiration date: {0}")]
    InvalidDate(String),

    #[error("invalid custom rpc endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Failure of the read-only context a rule consults.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContextError {
    /// The looked-up account, post or record does not exist.
    #[error("{0} does not exist")]
    NotFound(String),

    /// The backing source could not answer.
    #[error("context unavailable: {0}")]
    Unavailable(String),

    #[error("custom rpc call failed: {0}")]
    CustomRpc(String),
}
