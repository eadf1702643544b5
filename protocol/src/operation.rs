//! Decoded WISE operations.

use serde::{Deserialize, Serialize};
use wise_rules::{Ruleset, VoteOrder};
use wise_types::{AccountName, Moment, Timestamp, VoteOperation};

/// Publishes the full list of rulesets a delegator grants a voter. A later
/// `SetRules` for the same pair replaces the earlier one entirely.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SetRules {
    pub rulesets: Vec<Ruleset>,
}

impl SetRules {
    pub fn ruleset(&self, name: &str) -> Option<&Ruleset> {
        self.rulesets.iter().find(|r| r.name == name)
    }
}

/// The delegator's answer to a vote order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmVote {
    /// Transaction that carried the answered `SendVoteorder`.
    pub voteorder_tx_id: String,
    pub accepted: bool,
    /// Rejection reason, empty when accepted.
    pub message: String,
    /// The vote cast in the same transaction, when there is one.
    pub vote: Option<VoteOperation>,
}

impl ConfirmVote {
    pub fn accepted(voteorder_tx_id: impl Into<String>, vote: VoteOperation) -> Self {
        Self {
            voteorder_tx_id: voteorder_tx_id.into(),
            accepted: true,
            message: String::new(),
            vote: Some(vote),
        }
    }

    pub fn rejected(voteorder_tx_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            voteorder_tx_id: voteorder_tx_id.into(),
            accepted: false,
            message: message.into(),
            vote: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    SetRules(SetRules),
    SendVoteorder(VoteOrder),
    ConfirmVote(ConfirmVote),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetRules(_) => "set_rules",
            Self::SendVoteorder(_) => "send_voteorder",
            Self::ConfirmVote(_) => "confirm_vote",
        }
    }

    /// Account that has to sign a transaction carrying this command.
    pub fn sender<'a>(&self, delegator: &'a str, voter: &'a str) -> &'a str {
        match self {
            Self::SendVoteorder(_) => voter,
            Self::SetRules(_) | Self::ConfirmVote(_) => delegator,
        }
    }
}

/// A WISE operation as found on chain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EffectuatedOperation {
    pub moment: Moment,
    pub transaction_id: String,
    pub timestamp: Timestamp,
    pub delegator: AccountName,
    pub voter: AccountName,
    pub command: Command,
}

impl EffectuatedOperation {
    pub fn set_rules(&self) -> Option<&SetRules> {
        match &self.command {
            Command::SetRules(cmd) => Some(cmd),
            _ => None,
        }
    }

    pub fn voteorder(&self) -> Option<&VoteOrder> {
        match &self.command {
            Command::SendVoteorder(order) => Some(order),
            _ => None,
        }
    }

    pub fn confirm_vote(&self) -> Option<&ConfirmVote> {
        match &self.command {
            Command::ConfirmVote(cmd) => Some(cmd),
            _ => None,
        }
    }

    pub fn sender(&self) -> &str {
        self.command.sender(&self.delegator, &self.voter)
    }
}

/// A `SetRules` snapshot together with where it was published.
#[derive(Clone, Debug, PartialEq)]
pub struct EffectuatedSetRules {
    pub moment: Moment,
    pub delegator: AccountName,
    pub voter: AccountName,
    pub rules: SetRules,
}

impl EffectuatedSetRules {
    pub fn from_operation(op: &EffectuatedOperation) -> Option<Self> {
        op.set_rules().map(|rules| Self {
            moment: op.moment,
            delegator: op.delegator.clone(),
            voter: op.voter.clone(),
            rules: rules.clone(),
        })
    }
}
