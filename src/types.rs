//! Type definitions shared by the wrappers.

use std::time::Duration;

use tracing::warn;

use crate::codec::{OwnedBuffer, WireValue};
use crate::data::DataMapChunk;
use crate::error::Result;
use crate::ffi::{BufferAbi, RustBuffer};
use crate::wallet::Wallet;

/// Environment variable naming the native library to load.
pub const LIBRARY_ENV: &str = "ANT_FFI_LIBRARY";

/// Environment variable holding the default async timeout in seconds.
pub const TIMEOUT_ENV: &str = "ANT_FFI_TIMEOUT_SECS";

/// Options applied to every call made through a [`Library`](crate::Library).
#[derive(Debug, Clone, Default)]
pub struct LibraryOptions {
    /// Deadline applied to async calls made without a
    /// [`CancelToken`](crate::CancelToken). `None` waits indefinitely.
    pub default_timeout: Option<Duration>,
}

impl LibraryOptions {
    /// Read options from the environment.
    ///
    /// `ANT_FFI_TIMEOUT_SECS` sets [`default_timeout`](Self::default_timeout);
    /// unparsable values are logged and ignored.
    pub fn from_env() -> Self {
        let default_timeout = std::env::var(TIMEOUT_ENV)
            .ok()
            .and_then(|value| parse_timeout(&value));
        Self { default_timeout }
    }
}

fn parse_timeout(value: &str) -> Option<Duration> {
    match value.trim().parse::<u64>() {
        Ok(secs) => Some(Duration::from_secs(secs)),
        Err(err) => {
            warn!(var = TIMEOUT_ENV, value, error = %err, "ignoring invalid timeout");
            None
        }
    }
}

/// How an upload is paid for.
#[derive(Debug, Clone, Copy)]
pub enum PaymentOption<'a> {
    /// Pay from an EVM wallet.
    Wallet(&'a Wallet),
}

impl PaymentOption<'_> {
    /// Union discriminant of the wallet variant.
    pub const WALLET_DISCRIMINANT: u32 = 1;
}

impl<'a> From<&'a Wallet> for PaymentOption<'a> {
    fn from(wallet: &'a Wallet) -> Self {
        PaymentOption::Wallet(wallet)
    }
}

/// Lower an optional payment into the buffer a native upload takes.
///
/// No payment is the empty buffer. A wallet is sent as its union variant
/// carrying a cloned token, which the native call takes ownership of.
pub(crate) fn lower_payment(
    buffers: &BufferAbi,
    payment: Option<PaymentOption<'_>>,
) -> Result<OwnedBuffer> {
    match payment {
        None => Ok(OwnedBuffer::new(RustBuffer::empty(), *buffers)),
        Some(PaymentOption::Wallet(wallet)) => {
            let token = wallet.handle().use_token()?;
            let buf = buffers.encode_union_variant(
                PaymentOption::WALLET_DISCRIMINANT,
                &WireValue::Token(token.to_wire()),
            )?;
            // The buffer now carries the clone.
            token.into_raw();
            Ok(buf)
        }
    }
}

/// Result of a public data upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    /// Price paid, in tokens.
    pub price: String,
    /// Hex-encoded data address.
    pub address: String,
}

/// Result of a private data upload.
#[derive(Debug)]
pub struct DataPutResult {
    /// Cost paid, in tokens.
    pub cost: String,
    /// Data map needed to fetch the data back.
    pub data_map: DataMapChunk,
}
