//! Nullable infrastructure for deterministic testing.
//!
//! Everything the daemon talks to (the chain, the clock, custom RPC
//! endpoints) has an in-memory stand-in here that:
//! - returns deterministic values
//! - can be controlled programmatically
//! - records what was sent to it
//! - never touches the network
//!
//! Usage: build a [`FakeApi`], seed it with blocks, posts and accounts, and
//! hand it to `WiseApi::new`.

pub mod chain;
pub mod clock;
pub mod custom_rpc;
pub mod dataset;

pub use chain::FakeApi;
pub use clock::NullClock;
pub use custom_rpc::NullCustomRpc;
pub use dataset::Dataset;
