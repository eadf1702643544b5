//! The WISE synchronizer daemon.
//!
//! A [`Synchronizer`] follows the chain block by block on behalf of one
//! delegator, answers every vote order addressed to it with a confirmation
//! (casting the vote when the order passes the governing ruleset), and
//! reports its progress as [`DaemonEvent`]s.

pub mod config;
pub mod error;
pub mod event;
pub mod logging;
pub mod shutdown;
pub mod synchronizer;

pub use config::DaemonConfig;
pub use error::DaemonError;
pub use event::DaemonEvent;
pub use logging::{init_logging, LogFormat};
pub use shutdown::StopHandle;
pub use synchronizer::{DaemonState, Synchronizer};
