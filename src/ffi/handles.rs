//! Token types for opaque references to native objects and futures.
//!
//! Each token is a transparent newtype so it can cross the C boundary
//! unchanged while staying distinct on the Rust side.

use std::os::raw::c_void;

/// Macro to define a token type.
macro_rules! define_token {
    ($(#[$meta:meta])* $name:ident($repr:ty), $invalid:expr) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name($repr);

        impl $name {
            /// Create an invalid (null) token.
            #[inline]
            pub const fn invalid() -> Self {
                Self($invalid)
            }

            /// Check if this token is valid (non-null).
            #[inline]
            pub fn is_valid(&self) -> bool {
                *self != Self::invalid()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::invalid()
            }
        }
    };
}

define_token!(
    /// Pointer-sized token of a native object (an `Arc` on the native side).
    RawObject(*mut c_void),
    std::ptr::null_mut()
);

define_token!(
    /// Token of one in-flight native future.
    RustFutureHandle(u64),
    0
);

impl RawObject {
    /// Rebuild a token from its 8-byte wire form.
    pub fn from_wire(value: u64) -> Self {
        Self(value as usize as *mut c_void)
    }

    /// The 8-byte wire form of this token.
    pub fn to_wire(self) -> u64 {
        self.0 as usize as u64
    }

    /// The underlying pointer.
    pub fn as_ptr(self) -> *mut c_void {
        self.0
    }
}

impl RustFutureHandle {
    /// Wrap a future handle returned by a native method.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// The raw handle value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

// Tokens are opaque values; thread affinity is a property of the native
// object, which the library declares thread-safe.
unsafe impl Send for RawObject {}
unsafe impl Sync for RawObject {}
