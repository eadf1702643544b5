//! Nullable custom RPC endpoint.

use async_trait::async_trait;
use std::sync::Mutex;
use wise_api::{ApiError, CustomRpcClient};
use wise_rules::{CustomRpcCall, CustomRpcRule, Verdict};

/// Answers every call with a fixed verdict and records the calls.
pub struct NullCustomRpc {
    verdict: Verdict,
    calls: Mutex<Vec<CustomRpcCall>>,
}

impl NullCustomRpc {
    pub fn new(verdict: Verdict) -> Self {
        Self {
            verdict,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn accepting() -> Self {
        Self::new(Verdict::Accept)
    }

    pub fn calls(&self) -> Vec<CustomRpcCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CustomRpcClient for NullCustomRpc {
    async fn call(
        &self,
        _endpoint: &CustomRpcRule,
        call: &CustomRpcCall,
    ) -> Result<Verdict, ApiError> {
        self.calls.lock().unwrap().push(call.clone());
        Ok(self.verdict.clone())
    }
}
