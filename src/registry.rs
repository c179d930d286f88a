//! Registry routing native continuation callbacks to waiting operations.
//!
//! Native code cannot hold host closures, so each poll round registers a
//! single-slot channel under a fresh `u64` id and passes the id as the
//! callback data. [`continuation_callback`] is the one C-ABI entry point
//! handed to every poll; it looks the id up and delivers the poll result.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::LazyLock;

use crossbeam::channel::{self, Receiver, Sender, TrySendError};
use dashmap::DashMap;
use tracing::{trace, warn};

use crate::ffi::POLL_READY;

/// Poll result reported by the native side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollSignal {
    /// The future can be completed.
    Ready,
    /// The future made progress; poll again.
    MaybeReady,
}

// Anything but ready means poll again.
impl From<i8> for PollSignal {
    fn from(raw: i8) -> Self {
        if raw == POLL_READY {
            PollSignal::Ready
        } else {
            PollSignal::MaybeReady
        }
    }
}

/// Concurrent map from callback id to a single-slot channel.
///
/// Ids are never reused while the registry lives. Delivering to an unknown
/// id, or to a slot that already holds a value, drops the value.
pub struct CallbackRegistry<T> {
    next_id: AtomicU64,
    slots: DashMap<u64, Sender<T>>,
}

impl<T> CallbackRegistry<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            slots: DashMap::new(),
        }
    }

    /// Allocate a fresh id and its receiving slot.
    ///
    /// The slot is unregistered when the returned guard drops.
    pub fn register(&self) -> Registration<'_, T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = channel::bounded(1);
        self.slots.insert(id, tx);
        trace!(id, "registered callback slot");
        Registration {
            registry: self,
            id,
            rx,
        }
    }

    /// Deliver a value to the slot registered under `id`.
    ///
    /// Never blocks. Returns whether the value was accepted.
    pub fn deliver(&self, id: u64, value: T) -> bool {
        // Send outside the shard lock.
        let tx = match self.slots.get(&id) {
            Some(entry) => entry.value().clone(),
            None => {
                trace!(id, "dropped callback for unknown id");
                return false;
            }
        };
        match tx.try_send(value) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!(id, "callback slot already full; dropping signal");
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    /// Remove the slot registered under `id`.
    pub fn unregister(&self, id: u64) {
        self.slots.remove(&id);
    }

    /// Number of registered slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if no slots are registered.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<T> Default for CallbackRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A registered slot; unregisters itself on drop.
pub struct Registration<'a, T> {
    registry: &'a CallbackRegistry<T>,
    id: u64,
    rx: Receiver<T>,
}

impl<T> Registration<'_, T> {
    /// The id to pass as callback data.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Receiving end of the slot.
    pub fn receiver(&self) -> &Receiver<T> {
        &self.rx
    }
}

impl<T> Drop for Registration<'_, T> {
    fn drop(&mut self) {
        self.registry.unregister(self.id);
    }
}

static CONTINUATIONS: LazyLock<CallbackRegistry<PollSignal>> = LazyLock::new(CallbackRegistry::new);

/// Process-wide registry serving [`continuation_callback`].
pub fn continuations() -> &'static CallbackRegistry<PollSignal> {
    &CONTINUATIONS
}

/// Continuation entry point passed to every native poll.
///
/// May run on any native thread, possibly before the poll call returns.
pub extern "C" fn continuation_callback(callback_data: u64, poll_result: i8) {
    continuations().deliver(callback_data, PollSignal::from(poll_result));
}
