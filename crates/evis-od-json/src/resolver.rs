// crates/evis-od-json/src/resolver.rs

//! Maps the deserialized JSON model onto the core crate's input types.

use crate::error::JsonError;
use crate::model::{LookupTablesDocument, RawDescriptor, VariableDefsDocument};
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use evis_od::{DescriptorSource, IndexSource, LookupTable, ProfileSource};
use serde_json::Value;

/// Resolves a variable-definitions document into an unvalidated profile.
///
/// Only the JSON-level shape is checked here; the resolution-mode rules are
/// enforced by `SchemaRegistry::load`.
pub(crate) fn resolve_profile(doc: VariableDefsDocument) -> Result<ProfileSource, JsonError> {
    let mut indexes = Vec::with_capacity(doc.indexes.len());
    for (name, descriptors) in doc.indexes {
        let subindexes = descriptors
            .into_iter()
            .map(|d| resolve_descriptor(&name, d))
            .collect::<Result<Vec<_>, _>>()?;
        indexes.push(IndexSource { name, subindexes });
    }
    Ok(ProfileSource {
        version: doc.version,
        indexes,
    })
}

fn resolve_descriptor(index: &str, raw: RawDescriptor) -> Result<DescriptorSource, JsonError> {
    let factor = match raw.factor {
        None => None,
        Some(value) => Some(parse_factor(&value).ok_or_else(|| JsonError::NonIntegerFactor {
            index: index.to_string(),
            subindex: raw.subindex_name.clone(),
        })?),
    };
    Ok(DescriptorSource {
        subindex_name: raw.subindex_name,
        lookup_name: raw.lookup_name,
        lookup_func: raw.lookup_func,
        unit: raw.unit,
        factor,
    })
}

/// Integers are passed through for range checking by the registry; anything
/// larger than `i64::MAX` is saturated so it is still rejected there.
fn parse_factor(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|u| i64::try_from(u).unwrap_or(i64::MAX))),
        _ => None,
    }
}

/// Resolves the lookup-table document into named tables.
pub(crate) fn resolve_tables(
    doc: LookupTablesDocument,
) -> Result<Vec<(String, LookupTable)>, JsonError> {
    doc.into_iter()
        .map(|(name, entries)| {
            let mut table = LookupTable::new();
            for (key, value) in entries {
                let (code, label) = match value {
                    // "<code>": "<label>"
                    Value::String(label) => (parse_code(&key), label),
                    // "<label>": <code>
                    Value::Number(n) => (n.as_i64(), key.clone()),
                    _ => (None, key.clone()),
                };
                let code = code.ok_or_else(|| JsonError::InvalidTableEntry {
                    table: name.clone(),
                    key: key.clone(),
                })?;
                table.insert(code, label);
            }
            Ok((name, table))
        })
        .collect()
}

/// Parses a table key: decimal (optionally negative) or `0x`-prefixed hex.
pub(crate) fn parse_code(key: &str) -> Option<i64> {
    let key = key.trim();
    match key.strip_prefix("0x").or_else(|| key.strip_prefix("0X")) {
        Some(hex) => i64::from_str_radix(hex, 16).ok(),
        None => key.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::collections::BTreeMap;

    #[test]
    fn test_parse_code() {
        assert_eq!(parse_code("3"), Some(3));
        assert_eq!(parse_code("-1"), Some(-1));
        assert_eq!(parse_code("0x1F"), Some(31));
        assert_eq!(parse_code("0XfF"), Some(255));
        assert_eq!(parse_code("Charging"), None);
        assert_eq!(parse_code("0x"), None);
    }

    #[test]
    fn test_parse_factor() {
        assert_eq!(parse_factor(&Value::from(100)), Some(100));
        assert_eq!(parse_factor(&Value::from(-5)), Some(-5));
        assert_eq!(parse_factor(&Value::from(u64::MAX)), Some(i64::MAX));
        assert_eq!(parse_factor(&Value::from(2.5)), None);
        assert_eq!(parse_factor(&Value::from("100")), None);
    }

    #[test]
    fn test_both_entry_shapes() {
        let mut entries = BTreeMap::new();
        entries.insert("3".to_string(), Value::from("Charging"));
        entries.insert("Idle".to_string(), Value::from(0));
        let mut doc = LookupTablesDocument::new();
        doc.insert("CS_ChPt_StatusCode_e".to_string(), entries);

        let tables = resolve_tables(doc).unwrap();
        let (name, table) = &tables[0];
        assert_eq!(name, "CS_ChPt_StatusCode_e");
        assert_eq!(table.label(3).map(|l| &**l), Some("Charging"));
        assert_eq!(table.code_of("Idle"), Some(0));
    }

    #[test]
    fn test_invalid_entry() {
        let mut entries = BTreeMap::new();
        entries.insert("Charging".to_string(), Value::from("3"));
        let mut doc = LookupTablesDocument::new();
        doc.insert("CS_ChPt_StatusCode_e".to_string(), entries);

        assert!(matches!(
            resolve_tables(doc),
            Err(JsonError::InvalidTableEntry { ref key, .. }) if key == "Charging"
        ));
    }
}
