//! Rule engine for delegated voting.
//!
//! A delegator publishes named [`Ruleset`]s; each is an ordered list of
//! [`Rule`]s that must all pass for a voter's [`VoteOrder`] to be accepted.
//! Rules are pure predicates over the order and a read-only
//! [`ValidationContext`], which is the only I/O a rule ever performs.
//!
//! Every rule kind deserializes through a typed constructor that checks its
//! fields, so a `Rule` value is always well-formed.

pub mod age_of_post;
pub mod authors;
pub mod context;
pub mod custom_rpc;
pub mod error;
pub mod expiration_date;
pub mod first_post;
pub mod period;
pub mod rule;
pub mod ruleset;
pub mod tags;
pub mod threshold;
pub mod voteorder;
pub mod voters;
pub mod weight;
pub mod weight_for_period;

#[cfg(test)]
pub(crate) mod test_support;

pub use age_of_post::{AgeMode, AgeOfPostRule};
pub use authors::{AuthorsMode, AuthorsRule};
pub use context::{ConfirmationRecord, CustomRpcCall, ValidationContext};
pub use custom_rpc::CustomRpcRule;
pub use error::{ContextError, RuleError};
pub use expiration_date::ExpirationDateRule;
pub use first_post::{FirstPostRule, FIRST_POST_HORIZON};
pub use period::TimeUnit;
pub use rule::{Rule, RuleKind, Verdict};
pub use ruleset::Ruleset;
pub use tags::{TagsMode, TagsRule};
pub use threshold::{ComparisonMode, PayoutRule, VotesCountRule, VotingPowerRule};
pub use voteorder::VoteOrder;
pub use voters::{VotersMode, VotersRule};
pub use weight::WeightRule;
pub use weight_for_period::WeightForPeriodRule;
