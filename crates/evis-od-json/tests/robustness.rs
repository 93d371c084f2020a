//! Integration tests focused on error handling and edge cases.
//!
//! These tests ensure the loader correctly identifies and reports errors for
//! malformed JSON, invalid descriptors, and unknown references, without
//! panicking, and that one rejected profile never affects another.

use evis_od::{EvisRelease, ProfileId, SchemaError};
use evis_od_json::{
    JsonError, load_engine_from_str, load_lookup_tables_from_str, load_profile_from_str,
};

/// A minimal valid lookup-table document.
const MINIMAL_TABLES: &str = r#"{
  "CS_ChPt_StatusCode_e": { "Idle": 0, "Charging": 3 }
}"#;

/// A minimal valid profile used as a base for creating corrupted test cases.
const MINIMAL_VALID_JSON: &str = r#"{
  "indexes": {
    "CS_ChargePoint": [
      { "subindex_name": "CP_StatusCode", "lookup_name": "CS_ChPt_StatusCode_e" },
      {
        "subindex_name": "CP_ExtendedErrorCode",
        "lookup_func": "construct_extended_error_message"
      },
      { "subindex_name": "ProtocolType" }
    ],
    "PM_InChargeData": [
      { "subindex_name": "Temperature1", "unit": "degC", "factor": 1 }
    ]
  }
}"#;

fn build(profile_json: &str) -> Result<evis_od::DecodeEngine, JsonError> {
    load_engine_from_str(MINIMAL_TABLES, &[(ProfileId::from("efast"), profile_json)])
}

#[test]
fn test_minimal_document_is_valid() {
    let engine = build(MINIMAL_VALID_JSON).expect("Minimal document should load");
    assert!(engine.schema().contains("efast"));
}

/// Verifies that the parser catches malformed JSON syntax.
#[test]
fn test_malformed_json_syntax() {
    let result = load_profile_from_str(r#"{ "indexes": { "CS_ChargePoint": [ "#);
    assert!(
        matches!(result, Err(JsonError::JsonParsing(_))),
        "Expected JsonParsing error, got {:?}",
        result
    );
}

#[test]
fn test_missing_indexes_key() {
    let result = load_profile_from_str(r#"{ "version": "1.0" }"#);
    assert!(matches!(result, Err(JsonError::JsonParsing(_))));
}

#[test]
fn test_missing_subindex_name() {
    let json = MINIMAL_VALID_JSON.replace(
        r#""subindex_name": "ProtocolType""#,
        r#""name": "ProtocolType""#,
    );
    let result = load_profile_from_str(&json);
    assert!(matches!(result, Err(JsonError::JsonParsing(_))));
}

#[test]
fn test_unknown_fields_are_ignored() {
    let json = MINIMAL_VALID_JSON.replace(
        r#"{ "subindex_name": "ProtocolType" }"#,
        r#"{ "subindex_name": "ProtocolType", "description": "wire protocol", "access": "ro" }"#,
    );
    assert!(build(&json).is_ok(), "Unknown descriptor fields must not be rejected");
}

#[test]
fn test_non_integer_factor() {
    let json = MINIMAL_VALID_JSON.replace(r#""factor": 1"#, r#""factor": 0.5"#);
    let result = load_profile_from_str(&json);
    assert!(
        matches!(
            result,
            Err(JsonError::NonIntegerFactor { ref index, ref subindex })
                if index == "PM_InChargeData" && subindex == "Temperature1"
        ),
        "Expected NonIntegerFactor, got {:?}",
        result
    );

    let json = MINIMAL_VALID_JSON.replace(r#""factor": 1"#, r#""factor": "1""#);
    assert!(matches!(
        load_profile_from_str(&json),
        Err(JsonError::NonIntegerFactor { .. })
    ));
}

#[test]
fn test_non_positive_factor() {
    for factor in ["0", "-10", "4294967296"] {
        let json =
            MINIMAL_VALID_JSON.replace(r#""factor": 1"#, &format!(r#""factor": {}"#, factor));
        let result = build(&json);
        assert!(
            matches!(result, Err(JsonError::Schema(SchemaError::InvalidFactor { .. }))),
            "factor {} should be rejected, got {:?}",
            factor,
            result.err()
        );
    }
}

#[test]
fn test_unit_without_factor() {
    let json = MINIMAL_VALID_JSON.replace(r#", "factor": 1"#, "");
    assert!(matches!(
        build(&json),
        Err(JsonError::Schema(SchemaError::UnitWithoutFactor { .. }))
    ));
}

#[test]
fn test_two_resolution_modes() {
    let json = MINIMAL_VALID_JSON.replace(
        r#""lookup_name": "CS_ChPt_StatusCode_e""#,
        r#""lookup_name": "CS_ChPt_StatusCode_e", "unit": "A", "factor": 100"#,
    );
    assert!(matches!(
        build(&json),
        Err(JsonError::Schema(SchemaError::AmbiguousResolution { .. }))
    ));
}

#[test]
fn test_unknown_lookup_table() {
    let json = MINIMAL_VALID_JSON.replace("CS_ChPt_StatusCode_e", "CS_ChPt_Missing_e");
    assert!(matches!(
        build(&json),
        Err(JsonError::Schema(SchemaError::UnknownLookupTable { .. }))
    ));
}

#[test]
fn test_unregistered_capability() {
    let json = MINIMAL_VALID_JSON.replace(
        "construct_extended_error_message",
        "construct_something_else",
    );
    assert!(matches!(
        build(&json),
        Err(JsonError::Schema(SchemaError::UnregisteredCapability { ref function, .. }))
            if function == "construct_something_else"
    ));
}

#[test]
fn test_duplicate_subindex() {
    let json = MINIMAL_VALID_JSON.replace(
        r#"{ "subindex_name": "ProtocolType" }"#,
        r#"{ "subindex_name": "ProtocolType" }, { "subindex_name": "ProtocolType" }"#,
    );
    assert!(matches!(
        build(&json),
        Err(JsonError::Schema(SchemaError::DuplicateSubindex { .. }))
    ));
}

#[test]
fn test_invalid_table_entry() {
    let result =
        load_lookup_tables_from_str(r#"{ "CS_ChPt_StatusCode_e": { "Charging": "three" } }"#);
    assert!(matches!(result, Err(JsonError::InvalidTableEntry { .. })));

    let result = load_lookup_tables_from_str(r#"{ "CS_ChPt_StatusCode_e": { "Charging": [3] } }"#);
    assert!(matches!(result, Err(JsonError::InvalidTableEntry { .. })));
}

#[test]
fn test_bad_profile_fails_the_whole_build() {
    let broken = MINIMAL_VALID_JSON.replace(r#""factor": 1"#, r#""factor": 0"#);
    let result = load_engine_from_str(
        MINIMAL_TABLES,
        &[
            (EvisRelease::Efast.profile_id(), MINIMAL_VALID_JSON),
            (EvisRelease::V2g.profile_id(), broken.as_str()),
        ],
    );
    assert!(result.is_err(), "No partially loaded engine may be returned");
}

#[test]
fn test_rejected_profile_leaves_registry_usable() {
    let mut schema = build(MINIMAL_VALID_JSON)
        .expect("Minimal document should load")
        .schema()
        .clone();

    let broken = MINIMAL_VALID_JSON.replace(r#""factor": 1"#, r#""factor": 0"#);
    let source = load_profile_from_str(&broken).expect("JSON shape is valid");
    assert!(schema.load("v2g", source).is_err());

    assert!(!schema.contains("v2g"));
    assert!(
        schema
            .descriptor("efast", "CS_ChargePoint", "CP_StatusCode")
            .is_ok()
    );
}

#[test]
fn test_missing_sub_state_tables_skip_merge() {
    let json = MINIMAL_VALID_JSON.replace(
        r#"{ "subindex_name": "ProtocolType" }"#,
        r#"{ "subindex_name": "CP_SubStatusCode", "lookup_name": "CS_ChPt_SubStatusCode_e" }"#,
    );
    assert!(matches!(
        build(&json),
        Err(JsonError::Schema(SchemaError::UnknownLookupTable { ref table, .. }))
            if table == "CS_ChPt_SubStatusCode_e"
    ));
}
