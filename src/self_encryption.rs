//! Self-encryption of in-memory data.
//!
//! Content is encrypted with keys derived from the content itself, so equal
//! inputs always produce equal output.

use crate::error::{Error, Result};
use crate::library::Library;

/// Output of [`encrypt`]: an opaque blob accepted by [`decrypt`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedData {
    raw: Vec<u8>,
}

impl EncryptedData {
    /// Wrap bytes previously taken from [`as_bytes`](Self::as_bytes).
    pub fn from_bytes(raw: Vec<u8>) -> Self {
        Self { raw }
    }

    /// Size in bytes.
    pub fn size(&self) -> usize {
        self.raw.len()
    }

    /// Ciphertext as handed back by the library.
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    /// Take the ciphertext.
    pub fn into_bytes(self) -> Vec<u8> {
        self.raw
    }
}

/// Encrypt `data`.
pub fn encrypt(lib: &Library, data: &[u8]) -> Result<EncryptedData> {
    let api = lib.api();
    let input = api.buffers.encode_bytes(data)?;
    let buf = lib.call("encrypt", |status| unsafe {
        (api.self_encryption.encrypt)(input.into_raw(), status)
    })?;
    Ok(EncryptedData {
        raw: api.buffers.decode_raw(buf, true),
    })
}

/// Decrypt data produced by [`encrypt`].
///
/// Empty input is rejected without calling into the library.
pub fn decrypt(lib: &Library, encrypted: &EncryptedData) -> Result<Vec<u8>> {
    if encrypted.raw.is_empty() {
        return Err(Error::InvalidArgument("encrypted data is empty".to_string()));
    }

    let api = lib.api();
    // The blob is already serialized; it goes out without a length prefix.
    let input = api.buffers.encode_raw(&encrypted.raw)?;
    let buf = lib.call("decrypt", |status| unsafe {
        (api.self_encryption.decrypt)(input.into_raw(), status)
    })?;
    Ok(api.buffers.decode_bytes(buf, true))
}
