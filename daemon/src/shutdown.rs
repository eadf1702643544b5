//! Cooperative stop signal for the synchronizer.
//!
//! The synchronizer checks the flag at block boundaries and while waiting
//! for a block to be produced.

use tokio::signal;
use tokio::sync::watch;
use tracing::{info, warn};

pub struct StopHandle {
    tx: watch::Sender<bool>,
}

impl StopHandle {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    pub fn stop(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_stopped(&self) -> bool {
        *self.tx.borrow()
    }

    /// Wait for SIGINT or SIGTERM, then request a stop.
    pub async fn wait_for_signal(&self) {
        let ctrl_c = signal::ctrl_c();

        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    sigterm.recv().await;
                }
                Err(e) => {
                    warn!("failed to install SIGTERM handler: {e}");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => { info!("received SIGINT, stopping"); }
            _ = terminate => { info!("received SIGTERM, stopping"); }
        }

        self.stop();
    }
}

impl Default for StopHandle {
    fn default() -> Self {
        Self::new()
    }
}
