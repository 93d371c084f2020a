// src/lib.rs

#![cfg_attr(not(feature = "std"), no_std)]
#![doc = "Loads EVIS variable-definition and lookup-table JSON documents."]
#![doc = ""]
#![doc = "This `no_std + alloc` library turns the controller's JSON schema documents"]
#![doc = "into the input types of the `evis-od` decode engine."]
#![doc = ""]
#![doc = "It supports:"]
#![doc = "- `load_profile_from_str`: Parsing a `{release}_variable_defs.json` document."]
#![doc = "- `load_lookup_tables_from_str`: Parsing the enumeration tables document."]
#![doc = "- `load_engine_from_str`: Building a ready `DecodeEngine` from both."]

extern crate alloc;

// --- Crate Modules ---

mod error;
mod model;
mod parser;
mod resolver;

// --- Public API Re-exports ---

pub use error::JsonError;
pub use parser::{load_engine_from_str, load_lookup_tables_from_str, load_profile_from_str};
