//! Rust bindings for the ant_ffi native library.
//!
//! This crate provides a safe Rust interface to the Autonomi network client
//! exported by ant_ffi, allowing you to self-encrypt data, build chunks and
//! addresses, and store and fetch data on the network.
//!
//! The native library is loaded at runtime. Every native object is owned by
//! a wrapper that releases it exactly once, and every native async call is
//! driven to completion on the calling thread, honoring an optional
//! [`CancelToken`].
//!
//! # Example
//!
//! ```no_run
//! use ant::{CancelToken, Client, Library, Network, PaymentOption, Wallet};
//! use std::time::Duration;
//!
//! fn main() -> ant::Result<()> {
//!     // Load libant_ffi (path from ANT_FFI_LIBRARY)
//!     let lib = Library::from_env()?;
//!
//!     // Self-encryption runs locally
//!     let encrypted = ant::self_encryption::encrypt(&lib, b"Hello, World!")?;
//!     let data = ant::self_encryption::decrypt(&lib, &encrypted)?;
//!     assert_eq!(data, b"Hello, World!");
//!
//!     // Connect to a local testnet and pay with a wallet
//!     let network = Network::new(&lib, true)?;
//!     let wallet = Wallet::from_private_key(&network, "0x...")?;
//!     let client = Client::init_local(&lib, None)?;
//!
//!     let cancel = CancelToken::with_timeout(Duration::from_secs(60));
//!     let result = client.data_put_public(
//!         b"Hello, network!",
//!         Some(PaymentOption::Wallet(&wallet)),
//!         Some(&cancel),
//!     )?;
//!     println!("Stored at {} for {}", result.address, result.price);
//!
//!     let fetched = client.data_get_public(&result.address, Some(&cancel))?;
//!     println!("Fetched: {}", String::from_utf8_lossy(&fetched));
//!
//!     Ok(())
//! }
//! ```
//!
//! # Threading
//!
//! All wrapper types are `Send + Sync`. Native futures complete through a
//! callback the library invokes on its own threads; the waiting thread
//! blocks on a channel and never spins.

#[macro_use]
pub mod handle;

pub mod cancel;
pub mod client;
#[warn(missing_docs)]
pub mod codec;
pub mod data;
pub mod error;
pub mod ffi;
#[warn(missing_docs)]
pub mod future;
pub mod library;
pub mod registry;
pub mod self_encryption;
pub mod types;
pub mod wallet;


// Re-export main types at the crate root
pub use cancel::CancelToken;
pub use client::Client;
pub use data::{Chunk, ChunkAddress, DataAddress, DataMapChunk};
pub use error::{CancelReason, Error, Result};
pub use future::{FutureState, PendingOperation};
pub use handle::{ClonedToken, Handle};
pub use library::Library;
pub use registry::{CallbackRegistry, PollSignal};
pub use self_encryption::EncryptedData;
pub use types::{DataPutResult, LibraryOptions, PaymentOption, UploadResult};
pub use wallet::{Network, Wallet};
