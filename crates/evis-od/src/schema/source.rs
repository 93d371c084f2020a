// crates/evis-od/src/schema/source.rs

//! Unvalidated profile input.
//!
//! These types mirror the variable-definition documents one to one. Nothing
//! here is checked; [`SchemaRegistry::load`](super::SchemaRegistry::load)
//! validates a `ProfileSource` and turns it into a [`Profile`](super::Profile).

use alloc::string::String;
use alloc::vec::Vec;

/// A complete profile as read from a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileSource {
    pub version: Option<String>,
    /// Index definitions in document order.
    pub indexes: Vec<IndexSource>,
}

impl ProfileSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Appends an index definition.
    pub fn index(mut self, name: impl Into<String>, subindexes: Vec<DescriptorSource>) -> Self {
        self.indexes.push(IndexSource {
            name: name.into(),
            subindexes,
        });
        self
    }
}

/// One index definition; `subindexes` are in raw-record order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSource {
    pub name: String,
    pub subindexes: Vec<DescriptorSource>,
}

/// One subindex descriptor with every optional resolution field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptorSource {
    pub subindex_name: String,
    pub lookup_name: Option<String>,
    pub lookup_func: Option<String>,
    pub unit: Option<String>,
    /// Kept wide so that negative or oversized factors can be reported.
    pub factor: Option<i64>,
}

impl DescriptorSource {
    pub fn passthrough(name: impl Into<String>) -> Self {
        DescriptorSource {
            subindex_name: name.into(),
            ..Default::default()
        }
    }

    pub fn lookup(name: impl Into<String>, table: impl Into<String>) -> Self {
        DescriptorSource {
            subindex_name: name.into(),
            lookup_name: Some(table.into()),
            ..Default::default()
        }
    }

    pub fn custom(name: impl Into<String>, function: impl Into<String>) -> Self {
        DescriptorSource {
            subindex_name: name.into(),
            lookup_func: Some(function.into()),
            ..Default::default()
        }
    }

    pub fn scaled(name: impl Into<String>, unit: impl Into<String>, factor: i64) -> Self {
        DescriptorSource {
            subindex_name: name.into(),
            unit: Some(unit.into()),
            factor: Some(factor),
            ..Default::default()
        }
    }
}
