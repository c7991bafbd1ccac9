//! Cooperative cancellation for background producers.

use crossbeam_channel::{Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// A cloneable cancellation signal.
///
/// Cancelling closes an internal channel, so a producer blocked in a
/// `select!` on [`CancellationToken::signal`] wakes immediately instead of
/// waiting for its consumer.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    cancelled: AtomicBool,
    // Dropping the sender disconnects `signal`.
    trigger: Mutex<Option<Sender<()>>>,
    signal: Receiver<()>,
}

impl CancellationToken {
    /// Create a token that has not fired.
    #[must_use]
    pub fn new() -> Self {
        let (trigger, signal) = crossbeam_channel::bounded(0);
        Self {
            inner: Arc::new(Inner {
                cancelled: AtomicBool::new(false),
                trigger: Mutex::new(Some(trigger)),
                signal,
            }),
        }
    }

    /// Fire the token. Idempotent.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        let mut trigger = self
            .inner
            .trigger
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        trigger.take();
    }

    /// Whether the token has fired.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Channel that becomes ready (disconnected) once the token fires.
    pub(crate) fn signal(&self) -> &Receiver<()> {
        &self.inner.signal
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_cancel_is_shared_between_clones() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
        token.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_signal_wakes_after_cancel() {
        let token = CancellationToken::new();
        assert!(token
            .signal()
            .recv_timeout(Duration::from_millis(10))
            .is_err_and(|e| e.is_timeout()));

        token.cancel();
        assert!(token
            .signal()
            .recv_timeout(Duration::from_secs(5))
            .is_err_and(|e| e.is_disconnected()));
    }
}
