//! Hands the decision to an external JSON-RPC endpoint.

use serde::{Deserialize, Serialize};

use crate::{CustomRpcCall, ContextError, RuleError, ValidationContext, Verdict, VoteOrder};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCustomRpcRule")]
pub struct CustomRpcRule {
    pub host: String,
    pub port: u16,
    pub path: String,
    pub method: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCustomRpcRule {
    host: String,
    port: u16,
    path: String,
    method: String,
}

impl TryFrom<RawCustomRpcRule> for CustomRpcRule {
    type Error = RuleError;

    fn try_from(raw: RawCustomRpcRule) -> Result<Self, Self::Error> {
        Self::new(raw.host, raw.port, raw.path, raw.method)
    }
}

impl CustomRpcRule {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        path: impl Into<String>,
        method: impl Into<String>,
    ) -> Result<Self, RuleError> {
        let rule = Self {
            host: host.into(),
            port,
            path: path.into(),
            method: method.into(),
        };
        if rule.host.trim().is_empty() || rule.host.contains(['/', ' ']) {
            return Err(RuleError::InvalidEndpoint(format!("bad host {:?}", rule.host)));
        }
        if rule.method.trim().is_empty() {
            return Err(RuleError::InvalidEndpoint("empty method".into()));
        }
        Ok(rule)
    }

    /// `http://host:port/path`, with exactly one slash before the path.
    pub fn url(&self) -> String {
        format!(
            "http://{}:{}/{}",
            self.host,
            self.port,
            self.path.trim_start_matches('/')
        )
    }

    pub async fn validate(
        &self,
        order: &VoteOrder,
        ctx: &dyn ValidationContext,
    ) -> Result<Verdict, ContextError> {
        let call = CustomRpcCall {
            delegator: ctx.delegator().to_string(),
            voter: ctx.voter().to_string(),
            voteorder: order.clone(),
        };
        ctx.custom_rpc(self, &call).await
    }
}
