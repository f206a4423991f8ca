//! The initialization signal: a one-shot "startup resolution is done".
//!
//! At startup the session store may need a network round trip to find out
//! whether the persisted token is still valid. Until that finishes, the
//! published state is [`Unresolved`](crate::SessionState::Unresolved), and
//! a guard that read it too early would bounce a perfectly valid user to
//! the login page.
//!
//! So guards first wait on this signal. It's built on a
//! `tokio::sync::watch<bool>`:
//!
//! - the value flips `false → true` exactly once ([`complete`](InitSignal::complete));
//! - waiting on an already-completed signal returns immediately;
//! - if the completing side goes away without completing
//!   ([`abandon`](InitSignal::abandon)), waiters get [`SignalAbandoned`]
//!   instead of hanging forever.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;

/// Returned by [`InitSignal::wait`] when the signal was abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("initialization signal abandoned before completion")]
pub struct SignalAbandoned;

/// A cloneable one-shot completion marker.
///
/// Every clone observes the same signal.
#[derive(Debug, Clone)]
pub struct InitSignal {
    done: watch::Receiver<bool>,

    /// The sending half. `Some` until the signal is completed or abandoned;
    /// taking it out is what makes completion one-shot.
    completer: Arc<Mutex<Option<watch::Sender<bool>>>>,
}

impl InitSignal {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            done: rx,
            completer: Arc::new(Mutex::new(Some(tx))),
        }
    }

    /// Marks the signal complete and wakes every waiter.
    ///
    /// Returns `true` if this call completed it. Completing an
    /// already-settled signal is a no-op that returns `false`.
    pub fn complete(&self) -> bool {
        match self.completer.lock().take() {
            Some(tx) => {
                tx.send_replace(true);
                true
            }
            None => false,
        }
    }

    /// Settles the signal *without* completing it. Current and future
    /// waiters get [`SignalAbandoned`]. No-op once settled.
    pub fn abandon(&self) -> bool {
        // Dropping the sender closes the channel.
        self.completer.lock().take().is_some()
    }

    /// `true` once [`complete`](Self::complete) has run.
    pub fn is_complete(&self) -> bool {
        *self.done.borrow()
    }

    /// `true` once the signal is completed or abandoned.
    pub fn is_settled(&self) -> bool {
        self.completer.lock().is_none()
    }

    /// Waits until the signal settles.
    ///
    /// Returns immediately if it already completed. Waiting never triggers
    /// any work of its own.
    ///
    /// # Errors
    /// [`SignalAbandoned`] if the signal was abandoned.
    pub async fn wait(&self) -> Result<(), SignalAbandoned> {
        let mut rx = self.done.clone();
        // `wait_for` checks the current value before awaiting a change,
        // so a completed-then-closed channel still returns Ok.
        rx.wait_for(|done| *done)
            .await
            .map(|_| ())
            .map_err(|_| SignalAbandoned)
    }
}

impl Default for InitSignal {
    fn default() -> Self {
        Self::new()
    }
}
