// crates/evis-od/src/lookup.rs

//! Named enumeration tables.
//!
//! Tables map raw integer codes to symbolic labels and keep the reverse map
//! alongside so setpoint writers can go from label back to code.

use crate::error::LookupError;
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;
use log::{debug, warn};

/// Composite charge point sub-status table.
pub const SUB_STATUS_TABLE: &str = "CS_ChPt_SubStatusCode_e";
/// Per-state sub-status tables merged into [`SUB_STATUS_TABLE`], in merge order.
pub const SUB_STATE_TABLES: [&str; 6] = [
    "CS_ChPt_CP8SubStates_e",
    "CS_ChPt_CP2SubStates_e",
    "CS_ChPt_CP7SubStates_e",
    "CS_ChPt_CP4SubStates_e",
    "CS_ChPt_CP17SubStates_e",
    "CS_ChPt_CP10SubStates_e",
];

/// A single enumeration table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupTable {
    labels: BTreeMap<i64, Arc<str>>,
    codes: BTreeMap<Arc<str>, i64>,
}

impl LookupTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the label for `code`.
    ///
    /// The reverse map points at the most recently inserted code for a label.
    /// When that code is relabelled, it falls back to the lowest code still
    /// carrying the label.
    pub fn insert(&mut self, code: i64, label: impl Into<Arc<str>>) {
        let label = label.into();
        if let Some(old) = self.labels.insert(code, label.clone()) {
            if old != label && self.codes.get(&old) == Some(&code) {
                match self.labels.iter().find(|(_, l)| **l == old) {
                    Some((&other, _)) => self.codes.insert(old, other),
                    None => self.codes.remove(&old),
                };
            }
        }
        self.codes.insert(label, code);
    }

    pub fn label(&self, code: i64) -> Option<&Arc<str>> {
        self.labels.get(&code)
    }

    pub fn code_of(&self, label: &str) -> Option<i64> {
        self.codes.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Entries in ascending code order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, &str)> {
        self.labels.iter().map(|(code, label)| (*code, &**label))
    }
}

impl<L: Into<Arc<str>>> FromIterator<(i64, L)> for LookupTable {
    fn from_iter<I: IntoIterator<Item = (i64, L)>>(iter: I) -> Self {
        let mut table = LookupTable::new();
        for (code, label) in iter {
            table.insert(code, label);
        }
        table
    }
}

/// Holds every lookup table known to an engine, keyed by table name.
///
/// Tables are shared through `Arc` so descriptors can reference them without
/// owning them.
#[derive(Debug, Clone, Default)]
pub struct LookupTableStore {
    tables: BTreeMap<String, Arc<LookupTable>>,
}

impl LookupTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `table` under `name`, replacing any table of the same name.
    pub fn register(&mut self, name: impl Into<String>, table: LookupTable) {
        let name = name.into();
        debug!("Registering lookup table '{}' ({} entries)", name, table.len());
        if self.tables.insert(name.clone(), Arc::new(table)).is_some() {
            warn!("Lookup table '{}' replaced an existing table", name);
        }
    }

    /// Builds a composite table from already registered `sources`.
    ///
    /// Sources are applied in order, so later tables win on conflicting codes.
    pub fn register_merged(
        &mut self,
        name: impl Into<String>,
        sources: &[&str],
    ) -> Result<(), LookupError> {
        let mut merged = LookupTable::new();
        for source in sources {
            let table = self
                .tables
                .get(*source)
                .ok_or_else(|| LookupError::UnknownTable(source.to_string()))?;
            for (code, label) in table.labels.iter() {
                merged.insert(*code, label.clone());
            }
        }
        self.register(name, merged);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<LookupTable>> {
        self.tables.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Returns the label registered for `code` in table `name`.
    pub fn resolve(&self, name: &str, code: i64) -> Result<&Arc<str>, LookupError> {
        self.tables
            .get(name)
            .ok_or_else(|| LookupError::UnknownTable(name.to_string()))?
            .label(code)
            .ok_or_else(|| LookupError::UnknownCode {
                table: name.to_string(),
                code,
            })
    }

    /// Reverse lookup: the code registered for `label` in table `name`.
    pub fn code_of(&self, name: &str, label: &str) -> Result<i64, LookupError> {
        self.tables
            .get(name)
            .ok_or_else(|| LookupError::UnknownTable(name.to_string()))?
            .code_of(label)
            .ok_or_else(|| LookupError::UnknownLabel {
                table: name.to_string(),
                label: label.to_string(),
            })
    }

    pub fn names(&self) -> Vec<&str> {
        self.tables.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_table() -> LookupTable {
        [(0, "Idle"), (1, "Plugged"), (3, "Charging")]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_resolve_known_and_unknown_codes() {
        let mut store = LookupTableStore::new();
        store.register("CS_ChPt_StatusCode_e", status_table());

        assert_eq!(
            store.resolve("CS_ChPt_StatusCode_e", 3).map(|l| &**l),
            Ok("Charging")
        );
        assert_eq!(
            store.resolve("CS_ChPt_StatusCode_e", 999),
            Err(LookupError::UnknownCode {
                table: "CS_ChPt_StatusCode_e".into(),
                code: 999
            })
        );
        assert!(matches!(
            store.resolve("missing_e", 0),
            Err(LookupError::UnknownTable(_))
        ));
    }

    #[test]
    fn test_reverse_lookup() {
        let mut store = LookupTableStore::new();
        store.register("CS_ChPt_StatusCode_e", status_table());
        assert_eq!(store.code_of("CS_ChPt_StatusCode_e", "Plugged"), Ok(1));
        assert!(matches!(
            store.code_of("CS_ChPt_StatusCode_e", "Flying"),
            Err(LookupError::UnknownLabel { .. })
        ));
    }

    #[test]
    fn test_insert_keeps_reverse_map_consistent() {
        let mut table = LookupTable::new();
        table.insert(5, "Fault");
        table.insert(5, "Error");
        assert_eq!(table.code_of("Fault"), None);
        assert_eq!(table.code_of("Error"), Some(5));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_relabelled_code_keeps_shared_label_reachable() {
        let mut table = LookupTable::new();
        table.insert(1, "X");
        table.insert(2, "X");
        assert_eq!(table.code_of("X"), Some(2));

        table.insert(2, "Y");
        assert_eq!(table.code_of("X"), Some(1));
        assert_eq!(table.code_of("Y"), Some(2));
        assert_eq!(table.label(1).map(|l| &**l), Some("X"));

        table.insert(1, "Z");
        assert_eq!(table.code_of("X"), None);
    }

    #[test]
    fn test_register_merged_later_sources_win() {
        let mut store = LookupTableStore::new();
        store.register(
            "CP2_SubStates_e",
            [(0, "CP2_Init"), (1, "CP2_WaitPlug")].into_iter().collect(),
        );
        store.register(
            "CP7_SubStates_e",
            [(1, "CP7_Precharge"), (2, "CP7_Charge")].into_iter().collect(),
        );
        store
            .register_merged("CS_ChPt_SubStatusCode_e", &["CP2_SubStates_e", "CP7_SubStates_e"])
            .unwrap();

        let merged = store.get("CS_ChPt_SubStatusCode_e").unwrap();
        assert_eq!(merged.len(), 3);
        assert_eq!(merged.label(0).map(|l| &**l), Some("CP2_Init"));
        assert_eq!(merged.label(1).map(|l| &**l), Some("CP7_Precharge"));
        assert_eq!(merged.code_of("CP2_WaitPlug"), None);
    }

    #[test]
    fn test_register_merged_unknown_source() {
        let mut store = LookupTableStore::new();
        let result = store.register_merged("merged", &["nope"]);
        assert_eq!(result, Err(LookupError::UnknownTable("nope".into())));
        assert!(!store.contains("merged"));
    }
}
