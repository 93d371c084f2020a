// crates/evis-od-json/src/error.rs

use alloc::string::String;
use core::fmt;
use evis_od::{LookupError, SchemaError};

/// Errors that can occur while loading EVIS JSON documents.
#[derive(Debug)]
pub enum JsonError {
    /// An error from the underlying `serde_json` deserializer.
    JsonParsing(serde_json::Error),

    /// A `factor` that is not an integer (e.g. `2.5` or `"100"`).
    NonIntegerFactor { index: String, subindex: String },

    /// A lookup table entry with a key or value of the wrong shape.
    InvalidTableEntry { table: String, key: String },

    /// The profile document was rejected by the schema registry.
    Schema(SchemaError),

    /// A composite lookup table could not be built.
    Lookup(LookupError),
}

impl From<serde_json::Error> for JsonError {
    fn from(e: serde_json::Error) -> Self {
        JsonError::JsonParsing(e)
    }
}

impl From<SchemaError> for JsonError {
    fn from(e: SchemaError) -> Self {
        JsonError::Schema(e)
    }
}

impl From<LookupError> for JsonError {
    fn from(e: LookupError) -> Self {
        JsonError::Lookup(e)
    }
}

impl fmt::Display for JsonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonError::JsonParsing(e) => write!(f, "JSON parsing error: {}", e),
            JsonError::NonIntegerFactor { index, subindex } => {
                write!(f, "{}.{}: factor must be an integer", index, subindex)
            }
            JsonError::InvalidTableEntry { table, key } => {
                write!(f, "Invalid entry '{}' in lookup table '{}'", key, table)
            }
            JsonError::Schema(e) => write!(f, "Schema error: {}", e),
            JsonError::Lookup(e) => write!(f, "Lookup table error: {}", e),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for JsonError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            JsonError::JsonParsing(e) => Some(e),
            JsonError::Schema(e) => Some(e),
            JsonError::Lookup(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::JsonError;
    use alloc::string::ToString;
    use evis_od::SchemaError;

    #[test]
    fn test_from_serde_error() {
        let serde_err = serde_json::from_str::<()>("{ not json").unwrap_err();
        let err: JsonError = serde_err.into();
        assert!(matches!(err, JsonError::JsonParsing(_)));
    }

    #[test]
    fn test_display_names_field() {
        let err = JsonError::NonIntegerFactor {
            index: "PM_InChargeData".into(),
            subindex: "Temperature1".into(),
        };
        assert_eq!(
            err.to_string(),
            "PM_InChargeData.Temperature1: factor must be an integer"
        );

        let err: JsonError = SchemaError::EmptyIndexName.into();
        assert_eq!(err.to_string(), "Schema error: Index definition has an empty name");
    }
}
