//! Call status conversion utilities for FFI.

use tracing::warn;

use super::raw::{BufferAbi, RustCallStatus, CALL_SUCCESS};
use crate::error::{Error, Result};

/// Convert a failed call status into an [`Error`] and release its buffer.
///
/// The error buffer is decoded as a raw UTF-8 message and freed exactly
/// once.
pub fn error_from_status(buffers: &BufferAbi, status: &mut RustCallStatus, op: &str) -> Error {
    let error_buf = std::mem::take(&mut status.error_buf);
    let message = if error_buf.len > 0 {
        buffers.decode_string(error_buf)
    } else {
        buffers.free_buffer(error_buf);
        String::new()
    };

    let message = if message.is_empty() {
        format!("{} failed", op)
    } else {
        message
    };

    Error::Native {
        op: op.to_string(),
        code: status.code,
        message,
    }
}

/// Check a call status and convert to Result.
pub fn check_status(buffers: &BufferAbi, status: &mut RustCallStatus, op: &str) -> Result<()> {
    if status.code == CALL_SUCCESS {
        // A successful call never carries an error buffer, but free it if
        // the native side sent one anyway.
        if !status.error_buf.is_null() {
            warn!(op, "native call succeeded with a non-empty error buffer");
            buffers.free_buffer(std::mem::take(&mut status.error_buf));
        }
        return Ok(());
    }
    Err(error_from_status(buffers, status, op))
}

/// Invoke a native entry point that takes a status out-parameter.
///
/// # Safety
///
/// `call` must invoke a native function with the status pointer it is given
/// and return that function's result unchanged.
pub unsafe fn rust_call<R>(
    buffers: &BufferAbi,
    op: &str,
    call: impl FnOnce(*mut RustCallStatus) -> R,
) -> Result<R> {
    let mut status = RustCallStatus::default();
    let result = call(&mut status);
    check_status(buffers, &mut status, op)?;
    Ok(result)
}

