//! JSON-RPC client for the `custom_rpc` rule.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use wise_rules::{CustomRpcCall, CustomRpcRule, Verdict};

use crate::ApiError;

/// Default timeout for a custom RPC decision.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Asks a delegator-chosen endpoint to judge a vote order.
#[async_trait]
pub trait CustomRpcClient: Send + Sync {
    async fn call(&self, endpoint: &CustomRpcRule, call: &CustomRpcCall)
        -> Result<Verdict, ApiError>;
}

/// Sends `POST http://host:port/path` with a JSON-RPC 2.0 body whose
/// `params` is the [`CustomRpcCall`].
///
/// A `result` accepts the order; an `error` rejects it with `error.message`.
pub struct HttpCustomRpc {
    http_client: reqwest::Client,
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: &'a CustomRpcCall,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    message: String,
}

impl HttpCustomRpc {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT.min(timeout))
            .build()
            .unwrap_or_default();
        Self { http_client }
    }
}

impl Default for HttpCustomRpc {
    fn default() -> Self {
        Self::new()
    }
}

fn verdict_from(response: RpcResponse) -> Result<Verdict, ApiError> {
    match (response.error, response.result) {
        (Some(error), _) => Ok(Verdict::Reject(error.message)),
        (None, Some(_)) => Ok(Verdict::Accept),
        (None, None) => Err(ApiError::InvalidResponse(
            "response has neither result nor error".into(),
        )),
    }
}

#[async_trait]
impl CustomRpcClient for HttpCustomRpc {
    async fn call(
        &self,
        endpoint: &CustomRpcRule,
        call: &CustomRpcCall,
    ) -> Result<Verdict, ApiError> {
        let url = endpoint.url();
        let body = RpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method: &endpoint.method,
            params: call,
        };
        debug!(%url, method = %endpoint.method, "calling custom rpc");

        let response = self
            .http_client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ApiError::Unreachable(format!("request timed out: {e}"))
                } else if e.is_connect() {
                    ApiError::Unreachable(format!("connection failed: {e}"))
                } else {
                    ApiError::RequestFailed(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(ApiError::RequestFailed(format!(
                "HTTP status {}",
                response.status()
            )));
        }

        let parsed: RpcResponse = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
        verdict_from(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wise_rules::VoteOrder;

    fn parse(value: Value) -> Result<Verdict, ApiError> {
        verdict_from(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn result_accepts() {
        let verdict = parse(json!({"jsonrpc": "2.0", "id": 1, "result": true})).unwrap();
        assert_eq!(verdict, Verdict::Accept);
    }

    #[test]
    fn error_rejects_with_its_message() {
        let verdict = parse(json!({"id": 1, "error": {"code": -1, "message": "too late"}})).unwrap();
        assert_eq!(verdict, Verdict::reject("too late"));
    }

    #[test]
    fn empty_response_is_invalid() {
        assert!(matches!(
            parse(json!({"id": 1})),
            Err(ApiError::InvalidResponse(_))
        ));
    }

    #[test]
    fn request_body_carries_the_call() {
        let call = CustomRpcCall {
            delegator: "delegator".into(),
            voter: "voter".into(),
            voteorder: VoteOrder::new("r", "author", "p", 100),
        };
        let body = serde_json::to_value(RpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method: "judge",
            params: &call,
        })
        .unwrap();
        assert_eq!(body["method"], "judge");
        assert_eq!(body["params"]["voter"], "voter");
        assert_eq!(body["params"]["voteorder"]["weight"], 100);
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_an_error() {
        let client = HttpCustomRpc::with_timeout(Duration::from_millis(500));
        let endpoint = CustomRpcRule::new("127.0.0.1", 9, "/", "judge").unwrap();
        let call = CustomRpcCall {
            delegator: "d".into(),
            voter: "v".into(),
            voteorder: VoteOrder::new("r", "a", "p", 1),
        };
        assert!(client.call(&endpoint, &call).await.is_err());
    }
}
