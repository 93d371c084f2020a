// crates/evis-od-json/src/model.rs

//! Internal `serde` data structures that map directly to the EVIS JSON documents.
//! These are used for raw deserialization only; unknown fields are ignored so
//! that newer documents keep loading.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use serde::Deserialize;
use serde_json::Value;

/// The root of a `{release}_variable_defs.json` document.
#[derive(Debug, Deserialize)]
pub struct VariableDefsDocument {
    #[serde(default)]
    pub version: Option<String>,

    /// Index name -> subindex descriptors in record order.
    pub indexes: BTreeMap<String, Vec<RawDescriptor>>,
}

/// One entry of an index's descriptor list.
#[derive(Debug, Deserialize)]
pub struct RawDescriptor {
    pub subindex_name: String,

    #[serde(default)]
    pub lookup_name: Option<String>,

    #[serde(default)]
    pub lookup_func: Option<String>,

    #[serde(default)]
    pub unit: Option<String>,

    /// Kept as a raw JSON value so that `2.5` or `"100"` can be reported
    /// against the field instead of as an opaque parse error.
    #[serde(default)]
    pub factor: Option<Value>,
}

/// The root of the lookup-table document: table name -> entries.
///
/// Entries come in two shapes, `"<code>": "<label>"` and `"<label>": <code>`,
/// and are told apart per entry by the type of the value.
pub type LookupTablesDocument = BTreeMap<String, BTreeMap<String, Value>>;
