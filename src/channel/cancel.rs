//! Cancellation signal for blocked reads.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// A cloneable interrupt signal for channel reads.
///
/// Cancellation is sticky: once `cancel` has been called every clone reports
/// cancelled forever. Use a fresh token for the next read.
#[derive(Debug, Clone)]
pub struct CancelToken {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Interrupt every read waiting on this token (or one of its clones).
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once the token is cancelled.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so this can only end by cancellation.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

/// How a cancellable suspension ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Wake {
    Elapsed,
    Cancelled,
}

/// Sleep for `delay` unless `cancel` fires first.
pub(crate) async fn suspend(delay: Duration, cancel: &CancelToken) -> Wake {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Wake::Cancelled,
        _ = tokio::time::sleep(delay) => Wake::Elapsed,
    }
}
