//! Error types for the ant crate.

use std::fmt;

use thiserror::Error;

/// Result type alias for ant operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Why an async operation stopped before completing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// The caller cancelled the token.
    Requested,
    /// The token's deadline passed.
    DeadlineExceeded,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancelReason::Requested => f.write_str("cancelled"),
            CancelReason::DeadlineExceeded => f.write_str("deadline exceeded"),
        }
    }
}

/// Error type for ant operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Object or future was used after release.
    #[error("{resource} has been disposed")]
    Disposed {
        /// Type of the released object.
        resource: &'static str,
    },

    /// Function argument is invalid; no native call was made.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A native entry point reported a non-zero status.
    #[error("{message}")]
    Native {
        /// Operation that failed.
        op: String,
        /// Status code assigned by the native library.
        code: i8,
        /// Decoded error buffer, or a generic message when none was sent.
        message: String,
    },

    /// Operation was cancelled before the native side completed it.
    #[error("{op}: {reason}")]
    Cancelled {
        /// Operation that was abandoned.
        op: String,
        /// Cancellation or deadline.
        reason: CancelReason,
    },

    /// The native library could not be loaded.
    #[error("failed to load native library: {0}")]
    Load(String),
}

impl Error {
    /// Check if this is a disposed-resource error.
    pub fn is_disposed(&self) -> bool {
        matches!(self, Error::Disposed { .. })
    }

    /// Check if this is an invalid argument error.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }

    /// Check if this error came from the native library.
    pub fn is_native(&self) -> bool {
        matches!(self, Error::Native { .. })
    }

    /// Check if this is a cancelled error (explicit or deadline).
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled { .. })
    }

    /// Native status code, if this error came from the native library.
    pub fn native_code(&self) -> Option<i8> {
        match self {
            Error::Native { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<libloading::Error> for Error {
    fn from(err: libloading::Error) -> Self {
        Error::Load(err.to_string())
    }
}
