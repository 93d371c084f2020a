// crates/evis-od/src/error.rs

use crate::types::ProfileId;
use alloc::string::String;
use core::fmt;

/// Errors raised while installing a profile into the schema registry.
///
/// A `SchemaError` is fatal to the profile being loaded only; profiles that
/// were installed earlier stay untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The profile identifier is empty.
    EmptyProfileId,
    /// A profile with the same identifier is already installed.
    DuplicateProfile(ProfileId),
    /// An index definition has an empty name.
    EmptyIndexName,
    /// The same index name appears twice in one profile.
    DuplicateIndex { index: String },
    /// A subindex descriptor has an empty name.
    EmptySubindexName { index: String },
    /// The same subindex name appears twice in one index definition.
    DuplicateSubindex { index: String, subindex: String },
    /// More than one of `lookup_name`, `lookup_func` and `unit`/`factor` is present.
    AmbiguousResolution { index: String, subindex: String },
    /// `unit` is present without `factor`.
    UnitWithoutFactor { index: String, subindex: String },
    /// `factor` is present without `unit`.
    FactorWithoutUnit { index: String, subindex: String },
    /// `unit` is present but empty.
    EmptyUnit { index: String, subindex: String },
    /// `factor` is zero, negative, or does not fit a `u32`.
    InvalidFactor {
        index: String,
        subindex: String,
        factor: i64,
    },
    /// `lookup_name` references a table that is not registered.
    UnknownLookupTable {
        index: String,
        subindex: String,
        table: String,
    },
    /// `lookup_func` references a decoder the running build does not provide.
    UnregisteredCapability {
        index: String,
        subindex: String,
        function: String,
    },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyProfileId => write!(f, "Profile identifier must not be empty"),
            Self::DuplicateProfile(id) => write!(f, "Profile '{}' is already installed", id),
            Self::EmptyIndexName => write!(f, "Index definition has an empty name"),
            Self::DuplicateIndex { index } => write!(f, "Duplicate index definition '{}'", index),
            Self::EmptySubindexName { index } => {
                write!(f, "Index '{}' contains a subindex with an empty name", index)
            }
            Self::DuplicateSubindex { index, subindex } => {
                write!(f, "Duplicate subindex '{}' in index '{}'", subindex, index)
            }
            Self::AmbiguousResolution { index, subindex } => write!(
                f,
                "{}.{}: only one of lookup_name, lookup_func or unit/factor may be set",
                index, subindex
            ),
            Self::UnitWithoutFactor { index, subindex } => {
                write!(f, "{}.{}: unit is set without factor", index, subindex)
            }
            Self::FactorWithoutUnit { index, subindex } => {
                write!(f, "{}.{}: factor is set without unit", index, subindex)
            }
            Self::EmptyUnit { index, subindex } => {
                write!(f, "{}.{}: unit must not be empty", index, subindex)
            }
            Self::InvalidFactor {
                index,
                subindex,
                factor,
            } => write!(
                f,
                "{}.{}: factor {} is not a positive 32-bit integer",
                index, subindex, factor
            ),
            Self::UnknownLookupTable {
                index,
                subindex,
                table,
            } => write!(
                f,
                "{}.{}: lookup table '{}' is not registered",
                index, subindex, table
            ),
            Self::UnregisteredCapability {
                index,
                subindex,
                function,
            } => write!(
                f,
                "{}.{}: custom decoder '{}' is not registered",
                index, subindex, function
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SchemaError {}

/// Identifies what a failed lookup was searching for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotFound {
    Profile(ProfileId),
    Index { profile: ProfileId, index: String },
    Subindex {
        profile: ProfileId,
        index: String,
        subindex: String,
    },
}

impl fmt::Display for NotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Profile(id) => write!(f, "profile '{}' is not loaded", id),
            Self::Index { profile, index } => {
                write!(f, "index '{}' is not defined in profile '{}'", index, profile)
            }
            Self::Subindex {
                profile,
                index,
                subindex,
            } => write!(
                f,
                "subindex '{}' is not defined in index '{}' of profile '{}'",
                subindex, index, profile
            ),
        }
    }
}

/// Reasons a raw value does not have the shape a resolution strategy expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A fixed-width field received the wrong number of bytes.
    WrongLength { expected: usize, actual: usize },
    /// Raw bytes cannot be read as an integer (empty or wider than 8 bytes).
    UnsupportedWidth { actual: usize },
    /// An integer does not fit the field's width.
    ValueOutOfRange { value: i64, max: u64 },
    /// Little-endian bytes exceed the signed 64-bit range.
    IntegerOverflow,
    /// Decoder-specific failure reported by an injected decoder.
    Custom(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongLength { expected, actual } => {
                write!(f, "expected {} bytes but got {}", expected, actual)
            }
            Self::UnsupportedWidth { actual } => {
                write!(f, "cannot read {} bytes as an integer", actual)
            }
            Self::ValueOutOfRange { value, max } => {
                write!(f, "value {} is outside the range 0..={}", value, max)
            }
            Self::IntegerOverflow => write!(f, "raw bytes exceed the signed 64-bit range"),
            Self::Custom(msg) => write!(f, "{}", msg),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}

/// Failure of a single decode call.
///
/// Failures are local to one field: callers decoding a whole record keep
/// going with the remaining fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeFailure {
    /// Unknown profile, index or subindex.
    NotFound(NotFound),
    /// The raw value does not fit the descriptor's expected shape.
    MalformedInput {
        index: String,
        subindex: String,
        source: DecodeError,
    },
    /// A decoder was invoked by a name that is not registered.
    UnregisteredCapability { function: String },
}

impl fmt::Display for DecodeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(what) => write!(f, "Not found: {}", what),
            Self::MalformedInput {
                index,
                subindex,
                source,
            } => write!(f, "Malformed input for {}.{}: {}", index, subindex, source),
            Self::UnregisteredCapability { function } => {
                write!(f, "Custom decoder '{}' is not registered", function)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::MalformedInput { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<NotFound> for DecodeFailure {
    fn from(e: NotFound) -> Self {
        DecodeFailure::NotFound(e)
    }
}

/// Errors from direct use of the lookup table store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    UnknownTable(String),
    UnknownCode { table: String, code: i64 },
    UnknownLabel { table: String, label: String },
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownTable(name) => write!(f, "Lookup table '{}' is not registered", name),
            Self::UnknownCode { table, code } => {
                write!(f, "Code {} is not present in lookup table '{}'", code, table)
            }
            Self::UnknownLabel { table, label } => {
                write!(f, "Label '{}' is not present in lookup table '{}'", label, table)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LookupError {}

/// Errors converting a physical value back into its raw fixed-point form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleError {
    /// The scaled result does not fit a signed 64-bit raw value.
    Overflow,
}

impl fmt::Display for ScaleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overflow => write!(f, "Scaled value does not fit a 64-bit raw integer"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ScaleError {}

/// Error type for an unparsable controller software version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseError {
    InvalidVersion(String),
}

impl fmt::Display for ReleaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidVersion(v) => write!(f, "Invalid software version string: '{}'", v),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ReleaseError {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_schema_error_display_names_field() {
        let err = SchemaError::InvalidFactor {
            index: "PM_InChargeData".into(),
            subindex: "Temperature1".into(),
            factor: 0,
        };
        assert_eq!(
            err.to_string(),
            "PM_InChargeData.Temperature1: factor 0 is not a positive 32-bit integer"
        );
    }

    #[test]
    fn test_not_found_converts_to_failure() {
        let failure: DecodeFailure = NotFound::Profile(ProfileId::from("v2g")).into();
        assert!(matches!(failure, DecodeFailure::NotFound(NotFound::Profile(_))));
        assert_eq!(failure.to_string(), "Not found: profile 'v2g' is not loaded");
    }

    #[test]
    fn test_malformed_input_display() {
        let failure = DecodeFailure::MalformedInput {
            index: "CS_ChargePoint".into(),
            subindex: "CP_ExtendedErrorCode".into(),
            source: DecodeError::WrongLength {
                expected: 2,
                actual: 3,
            },
        };
        assert_eq!(
            failure.to_string(),
            "Malformed input for CS_ChargePoint.CP_ExtendedErrorCode: expected 2 bytes but got 3"
        );
    }
}
