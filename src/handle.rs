//! Lifecycle management for native object tokens.
//!
//! Every native object is reference counted on the native side. A
//! [`Handle`] owns one reference and guarantees it is released exactly
//! once: explicitly through [`Handle::release`], or on drop if the owner
//! never released it.
//!
//! Outgoing calls never use the owned token directly. [`Handle::use_token`]
//! clones it under the handle's lock and hands out a [`ClonedToken`], so a
//! concurrent release cannot invalidate a token a native call is about to
//! consume.

use std::mem::ManuallyDrop;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::ffi::{check_status, BufferAbi, ObjectAbi, RawObject, RustCallStatus};

struct HandleState {
    token: RawObject,
    released: bool,
}

/// Owner of one reference to a native object.
pub struct Handle {
    kind: &'static str,
    abi: ObjectAbi,
    buffers: BufferAbi,
    state: Mutex<HandleState>,
}

impl Handle {
    /// Take ownership of a token produced by a constructor or decode step.
    ///
    /// `kind` names the object type in errors and logs.
    pub fn wrap(kind: &'static str, token: RawObject, abi: ObjectAbi, buffers: BufferAbi) -> Self {
        Self {
            kind,
            abi,
            buffers,
            state: Mutex::new(HandleState {
                token,
                released: false,
            }),
        }
    }

    /// Object type this handle owns.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Check if the handle has been released.
    pub fn is_released(&self) -> bool {
        self.state.lock().released
    }

    /// Clone the token for one outgoing native call.
    ///
    /// Fails with [`Error::Disposed`] without touching native code if the
    /// handle was released, and with [`Error::Native`] if the native clone
    /// fails.
    pub fn use_token(&self) -> Result<ClonedToken> {
        let state = self.state.lock();
        if state.released || !state.token.is_valid() {
            return Err(Error::Disposed {
                resource: self.kind,
            });
        }

        let mut status = RustCallStatus::default();
        let cloned = unsafe { (self.abi.clone)(state.token, &mut status) };
        check_status(&self.buffers, &mut status, &format!("{}.clone", self.kind))?;

        Ok(ClonedToken {
            kind: self.kind,
            token: cloned,
            abi: self.abi,
            buffers: self.buffers,
        })
    }

    /// Release the native object.
    ///
    /// Idempotent: only the first call reaches native code. A failed native
    /// release is logged and the handle is still marked released.
    pub fn release(&self) {
        let mut state = self.state.lock();
        if state.released {
            return;
        }
        state.released = true;
        if !state.token.is_valid() {
            return;
        }

        free_object(self.kind, state.token, &self.abi, &self.buffers);
        debug!(kind = self.kind, "released native object");
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handle")
            .field("kind", &self.kind)
            .field("released", &self.is_released())
            .finish()
    }
}

/// A cloned token destined for exactly one native call.
///
/// Native entry points take ownership of object arguments, so the clone is
/// consumed by [`into_raw`](Self::into_raw). A clone that never reaches
/// native code is released on drop.
pub struct ClonedToken {
    kind: &'static str,
    token: RawObject,
    abi: ObjectAbi,
    buffers: BufferAbi,
}

impl ClonedToken {
    /// Hand the clone to a native call.
    pub fn into_raw(self) -> RawObject {
        let this = ManuallyDrop::new(self);
        this.token
    }

    /// The wire form of the clone, without giving up ownership.
    pub fn to_wire(&self) -> u64 {
        self.token.to_wire()
    }
}

impl std::fmt::Debug for ClonedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClonedToken")
            .field("kind", &self.kind)
            .field("token", &self.token)
            .finish()
    }
}

impl Drop for ClonedToken {
    fn drop(&mut self) {
        if self.token.is_valid() {
            free_object(self.kind, self.token, &self.abi, &self.buffers);
        }
    }
}

fn free_object(kind: &'static str, token: RawObject, abi: &ObjectAbi, buffers: &BufferAbi) {
    let mut status = RustCallStatus::default();
    unsafe { (abi.free)(token, &mut status) };
    if let Err(err) = check_status(buffers, &mut status, &format!("{}.free", kind)) {
        warn!(kind, error = %err, "native release failed; object may leak");
    }
}

/// Define a wrapper type owning one native object through a [`Handle`].
///
/// The generated type keeps a [`Library`](crate::Library) clone next to its
/// handle. The handle field comes first so it is released before the
/// library clone drops.
macro_rules! native_object {
    ($(#[$meta:meta])* $name:ident, $($abi:ident).+) => {
        $(#[$meta])*
        pub struct $name {
            handle: $crate::handle::Handle,
            lib: $crate::library::Library,
        }

        impl $name {
            pub(crate) fn from_token(
                lib: &$crate::library::Library,
                token: $crate::ffi::RawObject,
            ) -> Self {
                Self {
                    handle: lib.wrap(stringify!($name), token, lib.api().$($abi).+),
                    lib: lib.clone(),
                }
            }

            #[allow(dead_code)]
            pub(crate) fn handle(&self) -> &$crate::handle::Handle {
                &self.handle
            }

            /// Release the native object. Safe to call more than once; also
            /// runs on drop.
            pub fn release(&self) {
                self.handle.release();
            }

            /// Check if the object has been released.
            pub fn is_released(&self) -> bool {
                self.handle.is_released()
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("released", &self.is_released())
                    .finish()
            }
        }
    };
}
