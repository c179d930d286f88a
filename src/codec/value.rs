//! Polymorphic wire values and their field framing.

use bytes::{BufMut, BytesMut};

use super::wire_len;
use crate::error::Result;

/// A value crossing the native boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireValue {
    /// Raw byte sequence.
    Bytes(Vec<u8>),
    /// UTF-8 string.
    String(String),
    /// 64-bit unsigned integer.
    U64(u64),
    /// 8-bit signed integer or boolean.
    I8(i8),
    /// Object token in its 8-byte wire form.
    Token(u64),
    /// Fixed-layout record; fields in declaration order.
    Record(Vec<WireValue>),
    /// Tagged union: discriminant plus the active variant's payload.
    Union {
        /// Index of the active variant, sent as a big-endian u32.
        discriminant: u32,
        /// Payload of the active variant.
        payload: Box<WireValue>,
    },
}

/// Shape of a [`WireValue`], needed to read one back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireType {
    /// Length-prefixed byte sequence.
    Bytes,
    /// Length-prefixed UTF-8 string.
    String,
    /// Big-endian u64.
    U64,
    /// Single signed byte.
    I8,
    /// Object token as a big-endian u64.
    Token,
    /// Field shapes in declaration order.
    Record(Vec<WireType>),
    /// Variant payload shapes, indexed by discriminant.
    Union(Vec<WireType>),
}

/// Builds record and union payloads in field framing.
///
/// Strings and byte sequences are length-prefixed, integers and tokens are
/// big-endian, and nothing is padded.
#[derive(Debug, Default)]
pub struct WireWriter {
    buf: BytesMut,
}

impl WireWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a string with a 4-byte length prefix.
    pub fn put_string(&mut self, text: &str) -> Result<()> {
        self.put_bytes(text.as_bytes())
    }

    /// Append a byte sequence with a 4-byte length prefix.
    ///
    /// Fails with [`Error::InvalidArgument`](crate::Error::InvalidArgument)
    /// if `data` is longer than `i32::MAX`.
    pub fn put_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.buf.put_u32(wire_len(data.len())?);
        self.buf.put_slice(data);
        Ok(())
    }

    /// Append a big-endian u64.
    pub fn put_u64(&mut self, value: u64) {
        self.buf.put_u64(value);
    }

    /// Append a big-endian u32.
    pub fn put_u32(&mut self, value: u32) {
        self.buf.put_u32(value);
    }

    /// Append one signed byte.
    pub fn put_i8(&mut self, value: i8) {
        self.buf.put_i8(value);
    }

    /// Append an object token in its 8-byte wire form.
    pub fn put_token(&mut self, token: u64) {
        self.buf.put_u64(token);
    }

    /// Append a value in field framing.
    pub fn put_value(&mut self, value: &WireValue) -> Result<()> {
        match value {
            WireValue::Bytes(data) => self.put_bytes(data)?,
            WireValue::String(text) => self.put_string(text)?,
            WireValue::U64(n) => self.put_u64(*n),
            WireValue::I8(n) => self.put_i8(*n),
            WireValue::Token(token) => self.put_token(*token),
            WireValue::Record(fields) => {
                for field in fields {
                    self.put_value(field)?;
                }
            }
            WireValue::Union {
                discriminant,
                payload,
            } => {
                self.put_u32(*discriminant);
                self.put_value(payload)?;
            }
        }
        Ok(())
    }

    /// Bytes written so far.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Consume the writer, returning its bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.buf.to_vec()
    }
}

#[cfg(test)]
pub(crate) fn arb_typed_value() -> impl proptest::strategy::Strategy<Value = (WireType, WireValue)>
{
    use proptest::prelude::*;

    let leaf = prop_oneof![
        proptest::collection::vec(any::<u8>(), 0..64)
            .prop_map(|b| (WireType::Bytes, WireValue::Bytes(b))),
        ".{0,32}".prop_map(|s| (WireType::String, WireValue::String(s))),
        any::<u64>().prop_map(|n| (WireType::U64, WireValue::U64(n))),
        any::<i8>().prop_map(|n| (WireType::I8, WireValue::I8(n))),
        any::<u64>().prop_map(|n| (WireType::Token, WireValue::Token(n))),
    ];

    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..4).prop_map(|fields| {
                let (types, values): (Vec<_>, Vec<_>) = fields.into_iter().unzip();
                (WireType::Record(types), WireValue::Record(values))
            }),
            (inner, 0u32..3).prop_map(|((ty, value), discriminant)| {
                // Pad the variant list so `discriminant` selects `ty`.
                let mut variants = vec![WireType::U64; discriminant as usize];
                variants.push(ty);
                (
                    WireType::Union(variants),
                    WireValue::Union {
                        discriminant,
                        payload: Box::new(value),
                    },
                )
            }),
        ]
    })
}
