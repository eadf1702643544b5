use thiserror::Error;
use wise_protocol::ProtocolError;
use wise_rules::ContextError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("chain unavailable: {0}")]
    Unavailable(String),

    #[error("failed to broadcast: {0}")]
    SendFailed(String),

    #[error("custom rpc unreachable: {0}")]
    Unreachable(String),

    #[error("custom rpc request failed: {0}")]
    RequestFailed(String),

    #[error("invalid custom rpc response: {0}")]
    InvalidResponse(String),

    #[error("ruleset scope names neither a delegator nor a voter")]
    EmptyScope,

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

impl From<ApiError> for ContextError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::NotFound(what) => ContextError::NotFound(what),
            ApiError::Unreachable(_) | ApiError::RequestFailed(_) | ApiError::InvalidResponse(_) => {
                ContextError::CustomRpc(err.to_string())
            }
            other => ContextError::Unavailable(other.to_string()),
        }
    }
}
