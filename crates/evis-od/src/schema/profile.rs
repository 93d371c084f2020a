// crates/evis-od/src/schema/profile.rs

//! Validated, immutable profile data.

use crate::custom::DecoderFn;
use crate::lookup::LookupTable;
use crate::types::{ProfileId, SubindexRef};
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use core::num::NonZeroU32;

/// How a subindex turns its raw value into a decoded value.
///
/// Exactly one mode per descriptor; the variant holds everything the decode
/// step needs so no further registry lookups happen on the hot path.
#[derive(Clone)]
pub enum Resolution {
    Passthrough,
    Lookup {
        table_name: Arc<str>,
        table: Arc<LookupTable>,
    },
    Custom {
        function: Arc<str>,
        decoder: DecoderFn,
    },
    Scaled {
        unit: Arc<str>,
        factor: NonZeroU32,
    },
}

impl Resolution {
    pub fn kind(&self) -> ResolutionKind {
        match self {
            Resolution::Passthrough => ResolutionKind::Passthrough,
            Resolution::Lookup { .. } => ResolutionKind::Lookup,
            Resolution::Custom { .. } => ResolutionKind::Custom,
            Resolution::Scaled { .. } => ResolutionKind::Scaled,
        }
    }
}

impl fmt::Debug for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Passthrough => f.write_str("Passthrough"),
            Resolution::Lookup { table_name, table } => f
                .debug_struct("Lookup")
                .field("table_name", table_name)
                .field("entries", &table.len())
                .finish(),
            Resolution::Custom { function, .. } => {
                f.debug_struct("Custom").field("function", function).finish()
            }
            Resolution::Scaled { unit, factor } => f
                .debug_struct("Scaled")
                .field("unit", unit)
                .field("factor", factor)
                .finish(),
        }
    }
}

/// Discriminant of [`Resolution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionKind {
    Passthrough,
    Lookup,
    Custom,
    Scaled,
}

/// A validated subindex.
#[derive(Debug, Clone)]
pub struct SubindexDescriptor {
    pub name: Arc<str>,
    /// Zero-based position within the raw record.
    pub position: usize,
    pub resolution: Resolution,
}

/// A validated index: its subindexes in record order plus a name map.
#[derive(Debug, Clone)]
pub struct IndexDefinition {
    pub name: Arc<str>,
    subindexes: Vec<SubindexDescriptor>,
    by_name: BTreeMap<Arc<str>, usize>,
}

impl IndexDefinition {
    pub(crate) fn new(name: Arc<str>, subindexes: Vec<SubindexDescriptor>) -> Self {
        let by_name = subindexes
            .iter()
            .map(|d| (d.name.clone(), d.position))
            .collect();
        IndexDefinition {
            name,
            subindexes,
            by_name,
        }
    }

    pub fn subindex<'a>(
        &self,
        subindex: impl Into<SubindexRef<'a>>,
    ) -> Option<&SubindexDescriptor> {
        match subindex.into() {
            SubindexRef::Name(name) => self.by_name.get(name).map(|&i| &self.subindexes[i]),
            SubindexRef::Position(position) => self.subindexes.get(position),
        }
    }

    pub fn subindexes(&self) -> &[SubindexDescriptor] {
        &self.subindexes
    }

    pub fn len(&self) -> usize {
        self.subindexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subindexes.is_empty()
    }
}

/// A named, versioned set of index definitions.
#[derive(Debug, Clone)]
pub struct Profile {
    pub id: ProfileId,
    pub version: Option<String>,
    pub(crate) indexes: BTreeMap<Arc<str>, IndexDefinition>,
}

impl Profile {
    pub fn index(&self, name: &str) -> Option<&IndexDefinition> {
        self.indexes.get(name)
    }

    pub fn index_names(&self) -> impl Iterator<Item = &str> {
        self.indexes.keys().map(|k| &**k)
    }

    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }
}
