use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Encoded operations did not decode back to the same command. Such
    /// operations must never be broadcast.
    #[error("encoded {command} does not survive a decode round-trip: {reason}")]
    RoundTripMismatch {
        command: &'static str,
        reason: String,
    },

    #[error("no protocol version is registered")]
    NoHandler,

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
