use thiserror::Error;
use wise_api::ApiError;
use wise_protocol::ProtocolError;
use wise_rules::ContextError;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("chain error: {0}")]
    Api(#[from] ApiError),

    #[error("validation context failed: {0}")]
    Context(#[from] ContextError),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("synchronizer was already started")]
    AlreadyStarted,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
