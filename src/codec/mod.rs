//! Wire codec for values crossing the native boundary.
//!
//! Byte sequences and strings use different framing on the wire:
//!
//! * bytes are sent with a 4-byte big-endian length prefix, even when empty;
//! * strings are sent as raw UTF-8 with no prefix, and the empty string is
//!   the empty buffer (no allocation).
//!
//! Both conventions are fixed by the native library and must be reproduced
//! exactly. Inside records and tagged unions every field is framed the way
//! [`WireWriter`] writes it.

mod reader;
mod value;

pub use reader::WireReader;
pub use value::{WireType, WireValue, WireWriter};

use std::mem::ManuallyDrop;

use bytes::{BufMut, BytesMut};
use tracing::warn;

use crate::error::{Error, Result};
use crate::ffi::{check_status, BufferAbi, ForeignBytes, RustBuffer, RustCallStatus};

/// Length of the big-endian length prefix on byte sequences.
pub const LENGTH_PREFIX: usize = 4;

/// A native buffer owned by the host until it is handed to a native call.
///
/// Dropping an `OwnedBuffer` frees it with the native allocator.
pub struct OwnedBuffer {
    buf: RustBuffer,
    abi: BufferAbi,
}

impl OwnedBuffer {
    /// Take ownership of a buffer allocated by the native side.
    pub fn new(buf: RustBuffer, abi: BufferAbi) -> Self {
        Self { buf, abi }
    }

    /// Number of bytes in the buffer.
    pub fn len(&self) -> usize {
        self.buf.len as usize
    }

    /// Check if the buffer holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.buf.len == 0
    }

    /// View the buffer contents.
    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: the buffer came from the native allocator and is owned here.
        unsafe { self.buf.as_slice() }
    }

    /// Hand the buffer to a native call, which takes ownership of it.
    pub fn into_raw(self) -> RustBuffer {
        let this = ManuallyDrop::new(self);
        this.buf
    }
}

impl Drop for OwnedBuffer {
    fn drop(&mut self) {
        self.abi.free_buffer(std::mem::take(&mut self.buf));
    }
}

// OwnedBuffer exclusively owns its allocation
unsafe impl Send for OwnedBuffer {}

impl BufferAbi {
    /// Copy host bytes into a fresh native allocation.
    fn allocate(&self, data: &[u8]) -> Result<OwnedBuffer> {
        let len = i32::try_from(data.len()).map_err(|_| {
            Error::InvalidArgument(format!("buffer of {} bytes exceeds i32::MAX", data.len()))
        })?;
        let bytes = ForeignBytes {
            len,
            data: data.as_ptr(),
        };

        let mut status = RustCallStatus::default();
        let buf = unsafe { (self.from_bytes)(bytes, &mut status) };
        check_status(self, &mut status, "rustbuffer_from_bytes")?;
        Ok(OwnedBuffer::new(buf, *self))
    }

    /// Copy opaque bytes into a native buffer with no framing at all.
    pub fn encode_raw(&self, data: &[u8]) -> Result<OwnedBuffer> {
        self.allocate(data)
    }

    /// Encode a byte sequence: 4-byte big-endian length, then the payload.
    ///
    /// The empty sequence is still allocated, as a bare zero prefix.
    pub fn encode_bytes(&self, data: &[u8]) -> Result<OwnedBuffer> {
        let mut framed = BytesMut::with_capacity(LENGTH_PREFIX + data.len());
        framed.put_u32(wire_len(data.len())?);
        framed.put_slice(data);
        self.allocate(&framed)
    }

    /// Encode a string as raw UTF-8 without a length prefix.
    ///
    /// The empty string yields the empty buffer without calling the
    /// allocator.
    pub fn encode_string(&self, text: &str) -> Result<OwnedBuffer> {
        if text.is_empty() {
            return Ok(OwnedBuffer::new(RustBuffer::empty(), *self));
        }
        self.allocate(text.as_bytes())
    }

    /// Encode one variant of a tagged union: 4-byte big-endian discriminant,
    /// then the payload in field framing.
    pub fn encode_union_variant(&self, discriminant: u32, payload: &WireValue) -> Result<OwnedBuffer> {
        let mut writer = WireWriter::new();
        writer.put_u32(discriminant);
        writer.put_value(payload)?;
        self.allocate(writer.as_slice())
    }

    /// Encode an optional string: 1-byte presence tag, then the string in
    /// field framing when present.
    pub fn encode_optional_string(&self, text: Option<&str>) -> Result<OwnedBuffer> {
        let mut writer = WireWriter::new();
        match text {
            Some(text) => {
                writer.put_i8(1);
                writer.put_string(text)?;
            }
            None => writer.put_i8(0),
        }
        self.allocate(writer.as_slice())
    }

    /// Encode any value with its top-level framing.
    ///
    /// Strings go out raw and byte sequences length-prefixed, exactly as
    /// [`encode_string`](Self::encode_string) and
    /// [`encode_bytes`](Self::encode_bytes); every other value is written in
    /// field framing.
    pub fn encode_value(&self, value: &WireValue) -> Result<OwnedBuffer> {
        match value {
            WireValue::String(text) => self.encode_string(text),
            WireValue::Bytes(data) => self.encode_bytes(data),
            other => {
                let mut writer = WireWriter::new();
                writer.put_value(other)?;
                self.allocate(writer.as_slice())
            }
        }
    }

    /// Copy a byte sequence out of a native buffer.
    ///
    /// If the first four bytes, read as a big-endian length, equal the
    /// number of bytes after them, they are a prefix and are stripped;
    /// otherwise the content is returned as is. When `release` is set the
    /// buffer is freed after copying.
    pub fn decode_bytes(&self, buf: RustBuffer, release: bool) -> Vec<u8> {
        let data = self.decode_raw(buf, release);
        strip_length_prefix(data)
    }

    /// Copy a buffer out verbatim, with no prefix handling.
    pub fn decode_raw(&self, buf: RustBuffer, release: bool) -> Vec<u8> {
        // SAFETY: buffers passed here were returned by the native library.
        let data = unsafe { buf.as_slice() }.to_vec();
        if release {
            self.free_buffer(buf);
        }
        data
    }

    /// Copy a raw UTF-8 string out of a native buffer and free it.
    pub fn decode_string(&self, buf: RustBuffer) -> String {
        let data = self.decode_raw(buf, true);
        match String::from_utf8(data) {
            Ok(text) => text,
            Err(err) => {
                warn!("native string was not valid UTF-8; replacing invalid sequences");
                String::from_utf8_lossy(err.as_bytes()).into_owned()
            }
        }
    }

    /// Decode a value with its top-level framing, freeing the buffer.
    ///
    /// The inverse of [`encode_value`](Self::encode_value).
    pub fn decode_value(&self, buf: RustBuffer, ty: &WireType) -> WireValue {
        match ty {
            WireType::String => WireValue::String(self.decode_string(buf)),
            WireType::Bytes => WireValue::Bytes(self.decode_bytes(buf, true)),
            other => {
                let data = self.decode_raw(buf, true);
                WireReader::new(&data).read_value(other)
            }
        }
    }

    /// Return a buffer to the native allocator.
    ///
    /// The empty buffer is never passed to native code. A failure here is
    /// logged; the buffer is considered gone either way.
    pub fn free_buffer(&self, buf: RustBuffer) {
        if buf.is_null() {
            return;
        }
        let mut status = RustCallStatus::default();
        unsafe { (self.free)(buf, &mut status) };
        if status.code != 0 {
            warn!(code = status.code, "native buffer free failed");
        }
    }
}

/// Length of a payload as written in a 4-byte prefix.
pub(crate) fn wire_len(len: usize) -> Result<u32> {
    i32::try_from(len)
        .map(|len| len as u32)
        .map_err(|_| Error::InvalidArgument(format!("payload of {} bytes is too large", len)))
}

fn strip_length_prefix(mut data: Vec<u8>) -> Vec<u8> {
    if data.len() >= LENGTH_PREFIX {
        let mut prefix = [0u8; LENGTH_PREFIX];
        prefix.copy_from_slice(&data[..LENGTH_PREFIX]);
        if u32::from_be_bytes(prefix) as usize == data.len() - LENGTH_PREFIX {
            data.drain(..LENGTH_PREFIX);
        }
    }
    data
}
