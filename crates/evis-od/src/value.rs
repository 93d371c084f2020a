// crates/evis-od/src/value.rs

use crate::custom::CustomValue;
use crate::error::DecodeError;
use crate::scaling::Quantity;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

/// A raw field value as delivered by the transport.
///
/// Integers cover every numeric object-dictionary type up to 32 bits and the
/// signed 64-bit range. Byte strings carry values in little-endian wire order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RawValue {
    Integer(i64),
    Bytes(Vec<u8>),
}

impl RawValue {
    /// Parses a "0x..." or "..." hex string into a byte value.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let trimmed = s.strip_prefix("0x").unwrap_or(s);
        hex::decode(trimmed).map(RawValue::Bytes)
    }

    /// Reads the value as an integer.
    ///
    /// Byte strings of 1 to 8 bytes are read as unsigned little-endian.
    pub fn as_integer(&self) -> Result<i64, DecodeError> {
        match self {
            RawValue::Integer(v) => Ok(*v),
            RawValue::Bytes(bytes) => {
                if bytes.is_empty() || bytes.len() > 8 {
                    return Err(DecodeError::UnsupportedWidth {
                        actual: bytes.len(),
                    });
                }
                let mut buf = [0u8; 8];
                buf[..bytes.len()].copy_from_slice(bytes);
                i64::try_from(u64::from_le_bytes(buf)).map_err(|_| DecodeError::IntegerOverflow)
            }
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            RawValue::Bytes(bytes) => Some(bytes),
            RawValue::Integer(_) => None,
        }
    }
}

macro_rules! raw_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for RawValue {
                fn from(v: $t) -> Self {
                    RawValue::Integer(i64::from(v))
                }
            }
        )*
    };
}

raw_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<Vec<u8>> for RawValue {
    fn from(bytes: Vec<u8>) -> Self {
        RawValue::Bytes(bytes)
    }
}

impl From<&[u8]> for RawValue {
    fn from(bytes: &[u8]) -> Self {
        RawValue::Bytes(bytes.to_vec())
    }
}

impl<const N: usize> From<[u8; N]> for RawValue {
    fn from(bytes: [u8; N]) -> Self {
        RawValue::Bytes(bytes.to_vec())
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Integer(v) => write!(f, "{}", v),
            RawValue::Bytes(bytes) => write!(f, "0x{}", hex::encode(bytes)),
        }
    }
}

/// An enumeration code together with its label, when the table knows it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumCode {
    pub code: i64,
    pub label: Option<Arc<str>>,
}

impl EnumCode {
    pub fn is_recognized(&self) -> bool {
        self.label.is_some()
    }
}

/// The typed result of decoding one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedValue {
    /// Passthrough field: the raw value unchanged.
    Raw(RawValue),
    /// Enumeration code resolved through a lookup table.
    Label { code: i64, label: Arc<str> },
    /// Enumeration code absent from its lookup table.
    Unrecognized { code: i64 },
    /// Fixed-point integer converted to a physical quantity.
    Quantity(Quantity),
    /// Result of a named custom decoder.
    Custom(CustomValue),
}

impl DecodedValue {
    pub fn as_label(&self) -> Option<&str> {
        match self {
            DecodedValue::Label { label, .. } => Some(label),
            _ => None,
        }
    }

    pub fn as_quantity(&self) -> Option<&Quantity> {
        match self {
            DecodedValue::Quantity(q) => Some(q),
            _ => None,
        }
    }

    pub fn as_custom(&self) -> Option<&CustomValue> {
        match self {
            DecodedValue::Custom(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_unrecognized(&self) -> bool {
        matches!(self, DecodedValue::Unrecognized { .. })
    }
}

impl From<EnumCode> for DecodedValue {
    fn from(value: EnumCode) -> Self {
        match value.label {
            Some(label) => DecodedValue::Label {
                code: value.code,
                label,
            },
            None => DecodedValue::Unrecognized { code: value.code },
        }
    }
}

impl fmt::Display for DecodedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodedValue::Raw(raw) => write!(f, "{}", raw),
            DecodedValue::Label { label, .. } => f.write_str(label),
            DecodedValue::Unrecognized { code } => write!(f, "unrecognized ({})", code),
            DecodedValue::Quantity(q) => write!(f, "{}", q),
            DecodedValue::Custom(c) => write!(f, "{}", c),
        }
    }
}
