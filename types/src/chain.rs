//! Raw chain primitives: operations, transactions and blocks.
//!
//! Operations serialize the way the chain's JSON-RPC renders them: a
//! two-element array `[name, body]`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{AccountName, Timestamp, WiseError};

/// A cast vote.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoteOperation {
    pub voter: AccountName,
    pub author: AccountName,
    pub permlink: String,
    /// Signed weight in basis points: negative flags, positive upvotes.
    pub weight: i16,
}

/// An application-tagged structured-data operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomJsonOperation {
    pub id: String,
    /// JSON document, kept as the exact string the chain stores.
    pub json: String,
    #[serde(default)]
    pub required_auths: Vec<AccountName>,
    #[serde(default)]
    pub required_posting_auths: Vec<AccountName>,
}

impl CustomJsonOperation {
    /// Every account that authorized this operation.
    pub fn authorizers(&self) -> impl Iterator<Item = &AccountName> {
        self.required_auths
            .iter()
            .chain(self.required_posting_auths.iter())
    }
}

/// A single raw chain operation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "(String, Value)", try_from = "(String, Value)")]
pub enum Operation {
    Vote(VoteOperation),
    CustomJson(CustomJsonOperation),
    /// Traffic this crate has no model for.
    Other { name: String, payload: Value },
}

impl Operation {
    pub const VOTE: &'static str = "vote";
    pub const CUSTOM_JSON: &'static str = "custom_json";

    pub fn name(&self) -> &str {
        match self {
            Self::Vote(_) => Self::VOTE,
            Self::CustomJson(_) => Self::CUSTOM_JSON,
            Self::Other { name, .. } => name,
        }
    }

    pub fn as_vote(&self) -> Option<&VoteOperation> {
        match self {
            Self::Vote(vote) => Some(vote),
            _ => None,
        }
    }

    pub fn as_custom_json(&self) -> Option<&CustomJsonOperation> {
        match self {
            Self::CustomJson(cj) => Some(cj),
            _ => None,
        }
    }
}

impl From<Operation> for (String, Value) {
    fn from(op: Operation) -> Self {
        let render = |body: Result<Value, serde_json::Error>| body.unwrap_or(Value::Null);
        match op {
            Operation::Vote(vote) => (Operation::VOTE.into(), render(serde_json::to_value(vote))),
            Operation::CustomJson(cj) => {
                (Operation::CUSTOM_JSON.into(), render(serde_json::to_value(cj)))
            }
            Operation::Other { name, payload } => (name, payload),
        }
    }
}

impl TryFrom<(String, Value)> for Operation {
    type Error = WiseError;

    fn try_from((name, body): (String, Value)) -> Result<Self, Self::Error> {
        let invalid = |e: serde_json::Error| WiseError::Other(format!("malformed {name}: {e}"));
        match name.as_str() {
            Self::VOTE => serde_json::from_value(body.clone())
                .map(Self::Vote)
                .map_err(invalid),
            Self::CUSTOM_JSON => serde_json::from_value(body.clone())
                .map(Self::CustomJson)
                .map_err(invalid),
            _ => Ok(Self::Other {
                name,
                payload: body,
            }),
        }
    }
}

/// A transaction as included in a block.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub block_num: u64,
    pub transaction_num: u32,
    pub transaction_id: String,
    pub timestamp: Timestamp,
    pub ops: Vec<Operation>,
}

impl Transaction {
    /// Whether `account` authorized or is named by any operation here.
    pub fn involves(&self, account: &str) -> bool {
        self.ops.iter().any(|op| match op {
            Operation::Vote(vote) => vote.voter == account || vote.author == account,
            Operation::CustomJson(cj) => cj.authorizers().any(|a| a == account),
            Operation::Other { .. } => false,
        })
    }
}

/// A produced block.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub height: u64,
    pub timestamp: Timestamp,
    pub transactions: Vec<Transaction>,
}
