//! FFI bindings to the ant_ffi native library.
//!
//! This module contains the low-level C ABI: buffer, status and token
//! layouts, and the function pointer tables resolved from the library.
//! Users should prefer the safe Rust wrappers in the parent modules.

mod api;
pub mod error;
pub mod handles;
pub mod raw;

pub use error::{check_status, error_from_status, rust_call};
pub use handles::*;
pub use raw::*;
