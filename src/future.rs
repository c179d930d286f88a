//! Blocking bridge over native futures.
//!
//! A native async method returns a [`RustFutureHandle`]. The host drives it
//! with the poll/complete/cancel/free entry points of the handle's result
//! category, waking on [`continuation_callback`] deliveries instead of
//! spinning. [`PendingOperation::wait`] is the single generic routine; the
//! result categories differ only in the [`FutureAbi`] and the lift closure
//! passed to it.

use std::time::Instant;

use crossbeam::channel::{self, Receiver};
use crossbeam::select;
use tracing::{debug, trace};

use crate::cancel::CancelToken;
use crate::error::{CancelReason, Error, Result};
use crate::ffi::{
    check_status, BufferAbi, FutureAbi, RustCallStatus, RustFutureHandle, CALL_UNEXPECTED_ERROR,
};
use crate::registry::{continuation_callback, continuations, PollSignal};

/// Lifecycle of a [`PendingOperation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FutureState {
    /// Created, no poll issued yet.
    NotPolled,
    /// A poll was issued and its callback is registered.
    Polling,
    /// The native side signaled completion.
    Ready,
    /// The result was extracted and the future freed.
    Completed,
    /// The future was cancelled and freed.
    Cancelled,
}

/// One in-flight native future.
///
/// The future is freed exactly once: after completion, after cancellation,
/// or on drop if the operation was abandoned before either.
pub struct PendingOperation<T> {
    op: String,
    handle: RustFutureHandle,
    abi: FutureAbi<T>,
    buffers: BufferAbi,
    state: FutureState,
    polls: usize,
}

impl<T> PendingOperation<T> {
    /// Take ownership of a future handle returned by a native method.
    pub fn new(
        op: impl Into<String>,
        handle: RustFutureHandle,
        abi: FutureAbi<T>,
        buffers: BufferAbi,
    ) -> Self {
        Self {
            op: op.into(),
            handle,
            abi,
            buffers,
            state: FutureState::NotPolled,
            polls: 0,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> FutureState {
        self.state
    }

    /// Number of poll rounds issued so far.
    pub fn polls(&self) -> usize {
        self.polls
    }

    /// Block until the future completes or `cancel` fires.
    ///
    /// On completion the raw result is passed to `lift`. A non-zero status
    /// from the native complete call becomes [`Error::Native`] and `lift`
    /// is not called. If the token is cancelled or its deadline passes
    /// first, the native future is cancelled and freed, any result is
    /// discarded, and [`Error::Cancelled`] is returned.
    pub fn wait<R>(mut self, cancel: &CancelToken, lift: impl FnOnce(T) -> Result<R>) -> Result<R> {
        if !self.handle.is_valid() {
            self.state = FutureState::Completed;
            return Err(Error::Native {
                op: self.op.clone(),
                code: CALL_UNEXPECTED_ERROR,
                message: format!("{} returned no future", self.op),
            });
        }

        debug!(op = %self.op, future = self.handle.get(), "waiting on native future");
        let deadline: Receiver<Instant> = match cancel.deadline() {
            Some(deadline) => channel::at(deadline),
            None => channel::never(),
        };

        loop {
            if let Some(reason) = cancel.reason() {
                return Err(self.abandon(reason));
            }

            let signal = {
                let slot = continuations().register();
                self.state = FutureState::Polling;
                self.polls += 1;
                trace!(op = %self.op, future = self.handle.get(), round = self.polls, "poll");
                unsafe { (self.abi.poll)(self.handle, continuation_callback, slot.id()) };

                select! {
                    recv(slot.receiver()) -> signal => signal.ok(),
                    recv(cancel.signal()) -> _ => None,
                    recv(deadline) -> _ => None,
                }
            };

            // Cancellation wins over a signal that raced it.
            if let Some(reason) = cancel.reason() {
                return Err(self.abandon(reason));
            }

            match signal {
                Some(PollSignal::Ready) => break,
                Some(PollSignal::MaybeReady) | None => continue,
            }
        }

        self.state = FutureState::Ready;
        let mut status = RustCallStatus::default();
        let value = unsafe { (self.abi.complete)(self.handle, &mut status) };
        self.free();
        self.state = FutureState::Completed;
        check_status(&self.buffers, &mut status, &self.op)?;

        debug!(op = %self.op, polls = self.polls, "native future completed");
        lift(value)
    }

    fn abandon(&mut self, reason: CancelReason) -> Error {
        unsafe { (self.abi.cancel)(self.handle) };
        self.free();
        self.state = FutureState::Cancelled;
        debug!(op = %self.op, polls = self.polls, %reason, "native future cancelled");
        Error::Cancelled {
            op: self.op.clone(),
            reason,
        }
    }

    fn free(&mut self) {
        if self.handle.is_valid() {
            unsafe { (self.abi.free)(self.handle) };
            self.handle = RustFutureHandle::invalid();
        }
    }
}

impl<T> Drop for PendingOperation<T> {
    fn drop(&mut self) {
        match self.state {
            FutureState::Completed | FutureState::Cancelled => {}
            _ if !self.handle.is_valid() => {}
            _ => {
                unsafe { (self.abi.cancel)(self.handle) };
                self.free();
                self.state = FutureState::Cancelled;
            }
        }
    }
}

impl<T> std::fmt::Debug for PendingOperation<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingOperation")
            .field("op", &self.op)
            .field("handle", &self.handle)
            .field("state", &self.state)
            .field("polls", &self.polls)
            .finish()
    }
}
