// src/parser.rs

use crate::error::JsonError;
use crate::model::{LookupTablesDocument, VariableDefsDocument};
use crate::resolver;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use evis_od::lookup::{SUB_STATE_TABLES, SUB_STATUS_TABLE};
use evis_od::{
    CustomDecoderRegistry, DecodeEngine, LookupTable, LookupTableStore, ProfileId, ProfileSource,
    SchemaRegistry,
};
use log::{debug, info};

/// Parses a `{release}_variable_defs.json` document.
///
/// The result is not validated yet; pass it to `SchemaRegistry::load`.
///
/// # Errors
/// Returns a `JsonError` if the document is not valid JSON, does not have the
/// `indexes` shape, or contains a non-integer `factor`.
pub fn load_profile_from_str(json_content: &str) -> Result<ProfileSource, JsonError> {
    let doc: VariableDefsDocument = serde_json::from_str(json_content)?;
    resolver::resolve_profile(doc)
}

/// Parses the lookup-table document into `(table name, table)` pairs.
///
/// # Errors
/// Returns a `JsonError` if the document is not valid JSON or an entry is
/// neither `"<code>": "<label>"` nor `"<label>": <code>`.
pub fn load_lookup_tables_from_str(
    json_content: &str,
) -> Result<Vec<(String, LookupTable)>, JsonError> {
    let doc: LookupTablesDocument = serde_json::from_str(json_content)?;
    resolver::resolve_tables(doc)
}

/// Builds a ready engine from a lookup-table document and a set of profile
/// documents.
///
/// Tables are registered first, together with the built-in decoders, then
/// every profile is loaded under its id. When the document carries all the
/// per-state sub-status tables but no `CS_ChPt_SubStatusCode_e`, the
/// composite table is built from them.
///
/// # Errors
/// Returns the first `JsonError` met; no partially loaded engine is returned.
pub fn load_engine_from_str(
    tables_json: &str,
    profiles: &[(ProfileId, &str)],
) -> Result<DecodeEngine, JsonError> {
    let mut tables = LookupTableStore::new();
    for (name, table) in load_lookup_tables_from_str(tables_json)? {
        tables.register(name, table);
    }
    if !tables.contains(SUB_STATUS_TABLE) && SUB_STATE_TABLES.iter().all(|t| tables.contains(t)) {
        debug!("Building {} from the per-state tables", SUB_STATUS_TABLE);
        tables.register_merged(SUB_STATUS_TABLE, &SUB_STATE_TABLES)?;
    }

    let mut schema = SchemaRegistry::new(
        Arc::new(tables),
        Arc::new(CustomDecoderRegistry::with_builtins()),
    );
    for (id, json_content) in profiles {
        let source = load_profile_from_str(json_content)?;
        schema.load(id.clone(), source)?;
    }
    info!(
        "Decode engine ready with {} profiles",
        schema.profile_ids().count()
    );
    Ok(DecodeEngine::new(schema))
}
