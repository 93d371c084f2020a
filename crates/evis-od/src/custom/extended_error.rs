// crates/evis-od/src/custom/extended_error.rs

//! Built-in decoders for the controller's packed error words.
//!
//! The extended error word is 16 bits wide:
//!
//! | bits  | field    | resolved through                         |
//! |-------|----------|------------------------------------------|
//! | 0-3   | category | `extended_error_category_e`              |
//! | 4-8   | index    | not resolved (instance number)           |
//! | 9-15  | error    | per-category table, see [`error_table`]  |
//!
//! The fault word sent with an emergency message is 4 bytes: the basic error
//! code, the extended error word (little-endian) and an info byte whose bit 0
//! names the charge point interface.

use super::CustomValue;
use crate::error::DecodeError;
use crate::lookup::LookupTableStore;
use crate::value::{EnumCode, RawValue};
use core::fmt;

/// Function name of the extended error decoder.
pub const EXTENDED_ERROR_FUNCTION: &str = "construct_extended_error_message";
/// Function name of the emergency fault word decoder.
pub const FAULT_WORD_FUNCTION: &str = "decode_fault_word";
/// Table resolving the category nibble.
pub const EXTENDED_ERROR_CATEGORY_TABLE: &str = "extended_error_category_e";
/// Table resolving the basic error byte of a fault word.
pub const CHARGE_POINT_ERROR_TABLE: &str = "CS_ChPt_error_e";

const CATEGORY_MASK: u16 = 0b1111;
const INDEX_SHIFT: u16 = 4;
const INDEX_MASK: u16 = 0b1_1111;
const ERROR_SHIFT: u16 = 9;
const ERROR_MASK: u16 = 0b111_1111;

const FAULT_WORD_LEN: usize = 4;

static CATEGORY_ERROR_TABLES: [(&str, &str); 7] = [
    ("EE_NO_ERROR_CATEGORY", "extended_error_no_error_errors_e"),
    ("EE_SUP_CATEGORY", "extended_error_sup_errors"),
    ("EE_PM_CATEGORY", "extended_error_pm_errors"),
    ("EE_CS_CATEGORY", "extended_error_cs_errors"),
    ("EE_MPU_CATEGORY", "extended_error_mpu_errors"),
    ("EE_BMPU_CATEGORY", "extended_error_bmpu_errors"),
    ("EE_MULTIPLE_PU_CATEGORY", "extended_error_multiple_pu_errors"),
];

/// Returns the error table used for a category label.
pub fn error_table(category_label: &str) -> Option<&'static str> {
    CATEGORY_ERROR_TABLES
        .iter()
        .find(|(category, _)| *category == category_label)
        .map(|(_, table)| *table)
}

fn lookup(tables: &LookupTableStore, table: &str, code: i64) -> EnumCode {
    EnumCode {
        code,
        label: tables.resolve(table, code).ok().cloned(),
    }
}

/// A decoded extended error word.
///
/// Unknown categories and errors are kept as unrecognized codes rather than
/// failing the decode.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExtendedError {
    pub raw: u16,
    pub category: EnumCode,
    pub index: u8,
    pub error: EnumCode,
}

impl ExtendedError {
    /// Splits `word` and resolves its parts against `tables`.
    pub fn from_word(word: u16, tables: &LookupTableStore) -> Self {
        let category = i64::from(word & CATEGORY_MASK);
        let index = ((word >> INDEX_SHIFT) & INDEX_MASK) as u8;
        let error = i64::from((word >> ERROR_SHIFT) & ERROR_MASK);

        let category = lookup(tables, EXTENDED_ERROR_CATEGORY_TABLE, category);
        let error = match category.label.as_deref().and_then(error_table) {
            Some(table) => lookup(tables, table, error),
            None => EnumCode {
                code: error,
                label: None,
            },
        };
        ExtendedError {
            raw: word,
            category,
            index,
            error,
        }
    }

    /// Packs the three fields back into a word. Out-of-range bits are masked.
    pub fn encode(category: u8, index: u8, error: u8) -> u16 {
        (u16::from(category) & CATEGORY_MASK)
            | ((u16::from(index) & INDEX_MASK) << INDEX_SHIFT)
            | ((u16::from(error) & ERROR_MASK) << ERROR_SHIFT)
    }

    pub fn is_recognized(&self) -> bool {
        self.category.is_recognized() && self.error.is_recognized()
    }
}

impl fmt::Display for ExtendedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(category) = &self.category.label else {
            return write!(f, "Unknown category ee {}", self.category.code);
        };
        match &self.error.label {
            Some(error) => write!(f, "{} | {} | {}", category, self.index, error),
            None => write!(
                f,
                "Unknown error {} in ({},{})",
                self.error.code, category, self.index
            ),
        }
    }
}

/// Interface a fault word refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChargePointInterface {
    Ccs,
    Chademo,
}

impl fmt::Display for ChargePointInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChargePointInterface::Ccs => f.write_str("CCS"),
            ChargePointInterface::Chademo => f.write_str("CHAdeMO"),
        }
    }
}

/// A decoded emergency fault word.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FaultWord {
    pub error: EnumCode,
    pub extended_error: ExtendedError,
    pub additional_info: u8,
}

impl FaultWord {
    /// Decodes the 4-byte wire form.
    pub fn from_bytes(bytes: &[u8], tables: &LookupTableStore) -> Result<Self, DecodeError> {
        let &[error, ee_lo, ee_hi, additional_info] = bytes else {
            return Err(DecodeError::WrongLength {
                expected: FAULT_WORD_LEN,
                actual: bytes.len(),
            });
        };
        Ok(FaultWord {
            error: lookup(tables, CHARGE_POINT_ERROR_TABLE, i64::from(error)),
            extended_error: ExtendedError::from_word(u16::from_le_bytes([ee_lo, ee_hi]), tables),
            additional_info,
        })
    }

    /// Wire form of a fault word built from its parts.
    pub fn to_bytes(error: u8, extended_error: u16, additional_info: u8) -> [u8; FAULT_WORD_LEN] {
        let [ee_lo, ee_hi] = extended_error.to_le_bytes();
        [error, ee_lo, ee_hi, additional_info]
    }

    pub fn interface(&self) -> ChargePointInterface {
        if self.additional_info & 0b1 == 0 {
            ChargePointInterface::Ccs
        } else {
            ChargePointInterface::Chademo
        }
    }
}

impl fmt::Display for FaultWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error.label {
            Some(label) => write!(f, "{}", label)?,
            None => write!(f, "Unknown error code {}", self.error.code)?,
        }
        write!(f, " ({}) on {}", self.extended_error, self.interface())
    }
}

/// Decoder registered as [`EXTENDED_ERROR_FUNCTION`].
///
/// Accepts an integer in `0..=0xFFFF` or exactly two little-endian bytes.
pub fn decode_extended_error(
    raw: &RawValue,
    tables: &LookupTableStore,
) -> Result<CustomValue, DecodeError> {
    let word = match raw {
        RawValue::Integer(v) => u16::try_from(*v).map_err(|_| DecodeError::ValueOutOfRange {
            value: *v,
            max: u64::from(u16::MAX),
        })?,
        RawValue::Bytes(bytes) => match bytes.as_slice() {
            &[lo, hi] => u16::from_le_bytes([lo, hi]),
            other => {
                return Err(DecodeError::WrongLength {
                    expected: 2,
                    actual: other.len(),
                });
            }
        },
    };
    Ok(CustomValue::ExtendedError(ExtendedError::from_word(word, tables)))
}

/// Decoder registered as [`FAULT_WORD_FUNCTION`].
///
/// Accepts the 4-byte wire form, or the same bytes read as an unsigned
/// little-endian integer.
pub fn decode_fault_word(
    raw: &RawValue,
    tables: &LookupTableStore,
) -> Result<CustomValue, DecodeError> {
    let word = match raw {
        RawValue::Integer(v) => {
            let v32 = u32::try_from(*v).map_err(|_| DecodeError::ValueOutOfRange {
                value: *v,
                max: u64::from(u32::MAX),
            })?;
            FaultWord::from_bytes(&v32.to_le_bytes(), tables)?
        }
        RawValue::Bytes(bytes) => FaultWord::from_bytes(bytes, tables)?,
    };
    Ok(CustomValue::FaultWord(word))
}
