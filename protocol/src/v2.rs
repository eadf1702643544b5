//! Version 2 of the wire schema.
//!
//! The `custom_json` payload is a two-element array `[descriptor, body]`:
//!
//! ```text
//! ["v2:send_voteorder", {"delegator": "...", "ruleset": "...", "author": "...",
//!                        "permlink": "...", "weight": 5000}]
//! ```
//!
//! Bodies are strict: an unknown field anywhere drops the transaction.

use std::collections::HashSet;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;
use wise_rules::{Rule, Ruleset, VoteOrder};
use wise_types::{
    AccountName, CustomJsonOperation, Moment, Operation, Timestamp, Transaction, MAX_VOTE_WEIGHT,
};

use crate::{
    Command, ConfirmVote, EffectuatedOperation, ProtocolError, ProtocolVersionHandler, SetRules,
    CUSTOM_JSON_ID,
};

/// First block of the V2 era.
pub const V2_ACTIVATION_HEIGHT: u64 = 22_710_499;

const SET_RULES: &str = "v2:set_rules";
const SEND_VOTEORDER: &str = "v2:send_voteorder";
const CONFIRM_VOTE: &str = "v2:confirm_vote";

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct SetRulesBody {
    voter: AccountName,
    rulesets: Vec<(String, Vec<Rule>)>,
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct SendVoteorderBody {
    delegator: AccountName,
    ruleset: String,
    author: AccountName,
    permlink: String,
    weight: i16,
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfirmVoteBody {
    voter: AccountName,
    tx_id: String,
    accepted: bool,
    msg: String,
}

enum Rejection {
    /// No WISE marker at all.
    Foreign,
    Malformed(String),
}

fn malformed(reason: impl Into<String>) -> Rejection {
    Rejection::Malformed(reason.into())
}

fn body<T: DeserializeOwned>(descriptor: &str, value: Value) -> Result<T, Rejection> {
    serde_json::from_value(value).map_err(|e| malformed(format!("{descriptor}: {e}")))
}

fn account(name: AccountName, role: &str) -> Result<AccountName, Rejection> {
    if name.is_empty() {
        return Err(malformed(format!("empty {role}")));
    }
    Ok(name)
}

#[derive(Clone, Copy, Debug, Default)]
pub struct V2Handler;

impl V2Handler {
    fn decode(&self, tx: &Transaction) -> Result<Vec<EffectuatedOperation>, Rejection> {
        if tx.block_num < V2_ACTIVATION_HEIGHT {
            return Err(Rejection::Foreign);
        }

        let mut markers = tx.ops.iter().enumerate().filter_map(|(index, op)| {
            op.as_custom_json()
                .filter(|cj| cj.id == CUSTOM_JSON_ID)
                .map(|cj| (index, cj))
        });
        let Some((index, marker)) = markers.next() else {
            return Err(Rejection::Foreign);
        };
        if markers.next().is_some() {
            return Err(malformed("more than one wise operation"));
        }
        if index + 1 != tx.ops.len() {
            return Err(malformed("wise operation is not the last one"));
        }
        let sender = match (
            marker.required_auths.as_slice(),
            marker.required_posting_auths.as_slice(),
        ) {
            ([], [sender]) => sender.clone(),
            _ => return Err(malformed("wise operation must have exactly one posting authorizer")),
        };

        let (descriptor, payload): (String, Value) =
            serde_json::from_str(&marker.json).map_err(|e| malformed(e.to_string()))?;
        let (delegator, voter, command) = match descriptor.as_str() {
            SET_RULES => {
                let b: SetRulesBody = body(SET_RULES, payload)?;
                let mut names = HashSet::new();
                let mut seen = b.rulesets.iter().map(|(name, _)| name);
                if let Some(name) = seen.find(|name| !names.insert(*name)) {
                    return Err(malformed(format!("duplicate ruleset name {name:?}")));
                }
                let rulesets = b
                    .rulesets
                    .into_iter()
                    .map(|(name, rules)| Ruleset::new(name, rules))
                    .collect();
                (sender, account(b.voter, "voter")?, Command::SetRules(SetRules { rulesets }))
            }
            SEND_VOTEORDER => {
                let b: SendVoteorderBody = body(SEND_VOTEORDER, payload)?;
                if b.weight == 0 || b.weight.unsigned_abs() > MAX_VOTE_WEIGHT.unsigned_abs() {
                    return Err(malformed(format!("weight {} is out of range", b.weight)));
                }
                if b.ruleset.is_empty() || b.author.is_empty() || b.permlink.is_empty() {
                    return Err(malformed("incomplete voteorder"));
                }
                let order = VoteOrder::new(b.ruleset, b.author, b.permlink, b.weight);
                (account(b.delegator, "delegator")?, sender, Command::SendVoteorder(order))
            }
            CONFIRM_VOTE => {
                let b: ConfirmVoteBody = body(CONFIRM_VOTE, payload)?;
                // Bound only when the sole other operation is the sender's own vote.
                let vote = match tx.ops.as_slice() {
                    [Operation::Vote(vote), _] if vote.voter == sender => Some(vote.clone()),
                    _ => None,
                };
                let confirm = ConfirmVote {
                    voteorder_tx_id: b.tx_id,
                    accepted: b.accepted,
                    message: b.msg,
                    vote,
                };
                (sender, account(b.voter, "voter")?, Command::ConfirmVote(confirm))
            }
            other => return Err(malformed(format!("unknown descriptor {other:?}"))),
        };

        Ok(vec![EffectuatedOperation {
            moment: Moment::from_transaction(tx, index as u32),
            transaction_id: tx.transaction_id.clone(),
            timestamp: tx.timestamp,
            delegator,
            voter,
            command,
        }])
    }

    fn payload(delegator: &str, voter: &str, command: &Command) -> Result<String, ProtocolError> {
        let (descriptor, body) = match command {
            Command::SetRules(cmd) => (
                SET_RULES,
                serde_json::to_value(SetRulesBody {
                    voter: voter.into(),
                    rulesets: cmd
                        .rulesets
                        .iter()
                        .map(|r| (r.name.clone(), r.rules.clone()))
                        .collect(),
                })?,
            ),
            Command::SendVoteorder(order) => (
                SEND_VOTEORDER,
                serde_json::to_value(SendVoteorderBody {
                    delegator: delegator.into(),
                    ruleset: order.ruleset_name.clone(),
                    author: order.author.clone(),
                    permlink: order.permlink.clone(),
                    weight: order.weight,
                })?,
            ),
            Command::ConfirmVote(cmd) => (
                CONFIRM_VOTE,
                serde_json::to_value(ConfirmVoteBody {
                    voter: voter.into(),
                    tx_id: cmd.voteorder_tx_id.clone(),
                    accepted: cmd.accepted,
                    msg: cmd.message.clone(),
                })?,
            ),
        };
        Ok(serde_json::to_string(&(descriptor, body))?)
    }

    fn check_round_trip(
        &self,
        delegator: &str,
        voter: &str,
        command: &Command,
        ops: &[Operation],
    ) -> Result<(), ProtocolError> {
        let probe = Transaction {
            block_num: V2_ACTIVATION_HEIGHT,
            transaction_num: 0,
            transaction_id: String::new(),
            timestamp: Timestamp::EPOCH,
            ops: ops.to_vec(),
        };
        let mismatch = |reason: String| ProtocolError::RoundTripMismatch {
            command: command.name(),
            reason,
        };
        match self.decode(&probe) {
            Ok(decoded) => match decoded.as_slice() {
                [op] if op.delegator == delegator
                    && op.voter == voter
                    && op.command == *command =>
                {
                    Ok(())
                }
                _ => Err(mismatch("decoded operation differs".into())),
            },
            Err(Rejection::Foreign) => Err(mismatch("no wise operation".into())),
            Err(Rejection::Malformed(reason)) => Err(mismatch(reason)),
        }
    }
}

impl ProtocolVersionHandler for V2Handler {
    fn name(&self) -> &'static str {
        "v2"
    }

    fn activation_height(&self) -> u64 {
        V2_ACTIVATION_HEIGHT
    }

    fn handle_or_reject(&self, tx: &Transaction) -> Option<Vec<EffectuatedOperation>> {
        match self.decode(tx) {
            Ok(ops) => Some(ops),
            Err(Rejection::Foreign) => None,
            Err(Rejection::Malformed(reason)) => {
                trace!(tx_id = %tx.transaction_id, %reason, "ignoring malformed wise transaction");
                None
            }
        }
    }

    fn encode(
        &self,
        delegator: &str,
        voter: &str,
        command: &Command,
    ) -> Result<Vec<Operation>, ProtocolError> {
        let sender = command.sender(delegator, voter);
        let marker = Operation::CustomJson(CustomJsonOperation {
            id: CUSTOM_JSON_ID.into(),
            json: Self::payload(delegator, voter, command)?,
            required_auths: Vec::new(),
            required_posting_auths: vec![sender.into()],
        });

        let mut ops = Vec::with_capacity(2);
        if let Command::ConfirmVote(ConfirmVote {
            vote: Some(vote), ..
        }) = command
        {
            ops.push(Operation::Vote(vote.clone()));
        }
        ops.push(marker);

        self.check_round_trip(delegator, voter, command, &ops)?;
        Ok(ops)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wise_rules::{TagsMode, TagsRule, WeightRule};
    use wise_types::VoteOperation;

    const HEIGHT: u64 = V2_ACTIVATION_HEIGHT + 100;

    fn tx(ops: Vec<Operation>) -> Transaction {
        Transaction {
            block_num: HEIGHT,
            transaction_num: 3,
            transaction_id: "abc123".into(),
            timestamp: Timestamp::new(1_530_000_000),
            ops,
        }
    }

    fn marker(json: Value, posting_auths: &[&str]) -> Operation {
        Operation::CustomJson(CustomJsonOperation {
            id: CUSTOM_JSON_ID.into(),
            json: json.to_string(),
            required_auths: Vec::new(),
            required_posting_auths: posting_auths.iter().map(|a| a.to_string()).collect(),
        })
    }

    fn voteorder_json() -> Value {
        json!(["v2:send_voteorder", {
            "delegator": "steemprojects1",
            "ruleset": "test_purpose",
            "author": "pojan",
            "permlink": "how-to-install-free-vpn",
            "weight": 5000
        }])
    }

    fn round_trip(delegator: &str, voter: &str, command: Command) -> EffectuatedOperation {
        let ops = V2Handler.encode(delegator, voter, &command).unwrap();
        let decoded = V2Handler.handle_or_reject(&tx(ops)).unwrap();
        assert_eq!(decoded.len(), 1);
        let op = decoded.into_iter().next().unwrap();
        assert_eq!(op.delegator, delegator);
        assert_eq!(op.voter, voter);
        assert_eq!(op.command, command);
        op
    }

    #[test]
    fn decodes_a_voteorder() {
        let ops = V2Handler
            .handle_or_reject(&tx(vec![marker(voteorder_json(), &["guest123"])]))
            .unwrap();
        let op = &ops[0];
        assert_eq!(op.moment, Moment::new(HEIGHT, 3, 0));
        assert_eq!(op.delegator, "steemprojects1");
        assert_eq!(op.voter, "guest123");
        assert_eq!(op.transaction_id, "abc123");
        assert_eq!(
            op.voteorder(),
            Some(&VoteOrder::new("test_purpose", "pojan", "how-to-install-free-vpn", 5000))
        );
    }

    #[test]
    fn set_rules_round_trip() {
        let rules = SetRules {
            rulesets: vec![
                Ruleset::new(
                    "upvote",
                    vec![
                        Rule::Weight(WeightRule::new(0, 10_000).unwrap()),
                        Rule::Tags(TagsRule::new(TagsMode::Deny, vec!["nsfw".into()])),
                    ],
                ),
                Ruleset::new("empty", vec![]),
            ],
        };
        let op = round_trip("delegator", "voter", Command::SetRules(rules));
        assert_eq!(op.sender(), "delegator");
    }

    #[test]
    fn duplicate_ruleset_names_are_rejected() {
        let json = json!(["v2:set_rules", {
            "voter": "voter",
            "rulesets": [
                ["upvote", [{"rule": "weight", "min": 0, "max": 100}]],
                ["upvote", [{"rule": "weight", "min": 0, "max": 10000}]]
            ]
        }]);
        assert!(V2Handler
            .handle_or_reject(&tx(vec![marker(json, &["delegator"])]))
            .is_none());

        let rules = SetRules {
            rulesets: vec![
                Ruleset::new("upvote", vec![Rule::Weight(WeightRule::new(0, 100).unwrap())]),
                Ruleset::new("upvote", vec![Rule::Weight(WeightRule::new(0, 10_000).unwrap())]),
            ],
        };
        let err = V2Handler
            .encode("delegator", "voter", &Command::SetRules(rules))
            .unwrap_err();
        assert!(matches!(err, ProtocolError::RoundTripMismatch { .. }));
    }

    #[test]
    fn voteorder_round_trip() {
        let order = VoteOrder::new("upvote", "author", "permlink", -2500);
        let op = round_trip("delegator", "voter", Command::SendVoteorder(order));
        assert_eq!(op.sender(), "voter");
    }

    #[test]
    fn rejected_confirmation_round_trip() {
        let confirm = ConfirmVote::rejected("abc123", "Weight is too high");
        let op = round_trip("delegator", "voter", Command::ConfirmVote(confirm));
        assert_eq!(op.moment.operation_num, 0);
    }

    #[test]
    fn bound_confirmation_carries_the_vote() {
        let vote = VoteOperation {
            voter: "delegator".into(),
            author: "author".into(),
            permlink: "permlink".into(),
            weight: 5000,
        };
        let confirm = ConfirmVote::accepted("abc123", vote.clone());
        let ops = V2Handler
            .encode("delegator", "voter", &Command::ConfirmVote(confirm.clone()))
            .unwrap();
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0], Operation::Vote(vote));

        let op = round_trip("delegator", "voter", Command::ConfirmVote(confirm));
        // The marker is the second operation.
        assert_eq!(op.moment.operation_num, 1);
    }

    #[test]
    fn vote_by_someone_else_is_not_bound() {
        let json = json!(["v2:confirm_vote", {
            "voter": "voter", "tx_id": "abc", "accepted": true, "msg": ""
        }]);
        let foreign_vote = Operation::Vote(VoteOperation {
            voter: "stranger".into(),
            author: "author".into(),
            permlink: "permlink".into(),
            weight: 100,
        });
        let ops = V2Handler
            .handle_or_reject(&tx(vec![foreign_vote, marker(json, &["delegator"])]))
            .unwrap();
        assert_eq!(ops[0].confirm_vote().unwrap().vote, None);
    }

    #[test]
    fn encoding_a_mismatched_vote_fails() {
        let vote = VoteOperation {
            voter: "someone-else".into(),
            author: "author".into(),
            permlink: "permlink".into(),
            weight: 5000,
        };
        let confirm = ConfirmVote::accepted("abc123", vote);
        let res = V2Handler.encode("delegator", "voter", &Command::ConfirmVote(confirm));
        assert!(matches!(res, Err(ProtocolError::RoundTripMismatch { .. })));
    }

    #[test]
    fn encoding_an_out_of_range_weight_fails() {
        let order = VoteOrder::new("upvote", "author", "permlink", 0);
        let res = V2Handler.encode("delegator", "voter", &Command::SendVoteorder(order));
        assert!(matches!(res, Err(ProtocolError::RoundTripMismatch { .. })));
    }

    #[test]
    fn ignores_malformed_transactions() {
        let two_markers = tx(vec![
            marker(voteorder_json(), &["guest123"]),
            marker(voteorder_json(), &["guest123"]),
        ]);
        let two_authorizers = tx(vec![marker(voteorder_json(), &["a", "b"])]);
        let not_last = tx(vec![
            marker(voteorder_json(), &["guest123"]),
            Operation::Other {
                name: "transfer".into(),
                payload: json!({}),
            },
        ]);
        let mut extra = voteorder_json();
        extra[1]["mood"] = json!("happy");
        let unknown_field = tx(vec![marker(extra, &["guest123"])]);
        let unknown_rule_field = tx(vec![marker(
            json!(["v2:set_rules", {
                "voter": "v",
                "rulesets": [["r", [{"rule": "weight", "min": 0, "max": 1, "x": 0}]]]
            }]),
            &["d"],
        )]);
        let garbage = tx(vec![Operation::CustomJson(CustomJsonOperation {
            id: CUSTOM_JSON_ID.into(),
            json: "not json".into(),
            required_auths: Vec::new(),
            required_posting_auths: vec!["guest123".into()],
        })]);

        for tx in [two_markers, two_authorizers, not_last, unknown_field, unknown_rule_field, garbage] {
            assert_eq!(V2Handler.handle_or_reject(&tx), None);
        }
    }

    #[test]
    fn ignores_active_authority() {
        let op = Operation::CustomJson(CustomJsonOperation {
            id: CUSTOM_JSON_ID.into(),
            json: voteorder_json().to_string(),
            required_auths: vec!["guest123".into()],
            required_posting_auths: Vec::new(),
        });
        assert_eq!(V2Handler.handle_or_reject(&tx(vec![op])), None);
    }

    #[test]
    fn ignores_other_apps() {
        let op = Operation::CustomJson(CustomJsonOperation {
            id: "follow".into(),
            json: voteorder_json().to_string(),
            required_auths: Vec::new(),
            required_posting_auths: vec!["guest123".into()],
        });
        assert_eq!(V2Handler.handle_or_reject(&tx(vec![op])), None);
    }
}
