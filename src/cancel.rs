//! Cancellation tokens for async native operations.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam::channel::{self, Receiver, Sender};
use parking_lot::Mutex;

use crate::error::CancelReason;

struct Inner {
    cancelled: AtomicBool,
    // Dropped on cancel so every waiter's receiver disconnects at once.
    trigger: Mutex<Option<Sender<()>>>,
    signal: Receiver<()>,
    deadline: Option<Instant>,
}

/// A token for cancelling long-running operations.
///
/// Clones share state: cancelling one cancels all of them. A token may
/// carry a deadline, after which operations waiting on it stop with
/// [`CancelReason::DeadlineExceeded`].
///
/// # Example
///
/// ```
/// use ant::CancelToken;
/// use std::time::Duration;
///
/// let token = CancelToken::with_timeout(Duration::from_secs(30));
///
/// // In another thread:
/// // token.cancel();
///
/// if token.is_cancelled() {
///     println!("Operation was cancelled");
/// }
/// ```
#[derive(Clone)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

impl CancelToken {
    /// Create a new cancellation token without a deadline.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Create a token whose deadline is `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::build(Instant::now().checked_add(timeout))
    }

    /// Create a token with an absolute deadline.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self::build(Some(deadline))
    }

    fn build(deadline: Option<Instant>) -> Self {
        let (tx, rx) = channel::bounded(0);
        Self {
            inner: Arc::new(Inner {
                cancelled: AtomicBool::new(false),
                trigger: Mutex::new(Some(tx)),
                signal: rx,
                deadline,
            }),
        }
    }

    /// Cancel the token. All operations using this token will be cancelled.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.trigger.lock().take();
    }

    /// Check if the token has been cancelled explicitly.
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// The token's deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.inner.deadline
    }

    /// Why the token stops operations right now, if it does.
    pub fn reason(&self) -> Option<CancelReason> {
        if self.is_cancelled() {
            return Some(CancelReason::Requested);
        }
        match self.inner.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(CancelReason::DeadlineExceeded),
            _ => None,
        }
    }

    /// Receiver that disconnects when the token is cancelled.
    pub(crate) fn signal(&self) -> &Receiver<()> {
        &self.inner.signal
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .field("deadline", &self.inner.deadline)
            .finish()
    }
}
