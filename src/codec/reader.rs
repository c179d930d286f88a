//! Sequential reader over record payloads.

use bytes::Buf;

use super::value::{WireType, WireValue};
use super::LENGTH_PREFIX;
use crate::ffi::RawObject;

/// Reads the fields of a record in wire order.
///
/// Every read advances the cursor past the field it consumed. A read that
/// finds too few bytes left returns the zero value of its type; it never
/// fails. A length-prefixed field whose body is cut short still consumes
/// its prefix, and the body bytes stay unread. Field order is a contract with
/// the native library, so callers read fields in declaration order.
#[derive(Debug, Clone)]
pub struct WireReader<'a> {
    buf: &'a [u8],
}

impl<'a> WireReader<'a> {
    /// Create a reader positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { buf: data }
    }

    /// Number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    /// Check if every byte has been consumed.
    pub fn is_exhausted(&self) -> bool {
        !self.buf.has_remaining()
    }

    /// Split off a length-prefixed field, or `None` if it is truncated.
    fn read_framed(&mut self) -> Option<&'a [u8]> {
        if self.buf.remaining() < LENGTH_PREFIX {
            return None;
        }
        let len = self.buf.get_u32() as usize;
        if self.buf.remaining() < len {
            return None;
        }
        let (field, rest) = self.buf.split_at(len);
        self.buf = rest;
        Some(field)
    }

    /// Read a length-prefixed UTF-8 string.
    pub fn read_string(&mut self) -> String {
        self.read_framed()
            .map(|field| String::from_utf8_lossy(field).into_owned())
            .unwrap_or_default()
    }

    /// Read a length-prefixed byte sequence.
    pub fn read_bytes(&mut self) -> Vec<u8> {
        self.read_framed().map(<[u8]>::to_vec).unwrap_or_default()
    }

    /// Read an object token serialized as a big-endian u64.
    pub fn read_pointer(&mut self) -> RawObject {
        RawObject::from_wire(self.read_u64())
    }

    /// Read a big-endian u64.
    pub fn read_u64(&mut self) -> u64 {
        if self.buf.remaining() < 8 {
            return 0;
        }
        self.buf.get_u64()
    }

    /// Read a big-endian u32 (union discriminants).
    pub fn read_u32(&mut self) -> u32 {
        if self.buf.remaining() < 4 {
            return 0;
        }
        self.buf.get_u32()
    }

    /// Read a single signed byte (also used for booleans).
    pub fn read_i8(&mut self) -> i8 {
        if !self.buf.has_remaining() {
            return 0;
        }
        self.buf.get_i8()
    }

    /// Read a value of the given shape.
    pub fn read_value(&mut self, ty: &WireType) -> WireValue {
        match ty {
            WireType::Bytes => WireValue::Bytes(self.read_bytes()),
            WireType::String => WireValue::String(self.read_string()),
            WireType::U64 => WireValue::U64(self.read_u64()),
            WireType::I8 => WireValue::I8(self.read_i8()),
            WireType::Token => WireValue::Token(self.read_u64()),
            WireType::Record(fields) => {
                WireValue::Record(fields.iter().map(|field| self.read_value(field)).collect())
            }
            WireType::Union(variants) => {
                let discriminant = self.read_u32();
                let payload = match variants.get(discriminant as usize) {
                    Some(variant) => self.read_value(variant),
                    None => WireValue::Record(Vec::new()),
                };
                WireValue::Union {
                    discriminant,
                    payload: Box::new(payload),
                }
            }
        }
    }
}
