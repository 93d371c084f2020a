// crates/evis-od/src/reload.rs

//! Hot replacement of a running engine.

use crate::engine::DecodeEngine;
use crate::error::DecodeFailure;
use crate::types::{ProfileId, SubindexRef};
use crate::value::{DecodedValue, RawValue};
use arc_swap::ArcSwap;
use log::info;
use std::sync::Arc;

/// An engine handle that can be swapped atomically.
///
/// Readers take a snapshot with [`load`](Self::load) and keep decoding
/// against it; a concurrent [`replace`](Self::replace) only affects
/// snapshots taken afterwards.
#[derive(Debug)]
pub struct SharedEngine {
    current: ArcSwap<DecodeEngine>,
}

impl SharedEngine {
    pub fn new(engine: DecodeEngine) -> Self {
        SharedEngine {
            current: ArcSwap::from_pointee(engine),
        }
    }

    /// The engine generation currently installed.
    pub fn load(&self) -> Arc<DecodeEngine> {
        self.current.load_full()
    }

    /// Installs a fully built engine and returns the previous one.
    pub fn replace(&self, engine: DecodeEngine) -> Arc<DecodeEngine> {
        let profiles = engine.schema().profile_ids().count();
        let previous = self.current.swap(Arc::new(engine));
        info!("Replaced decode engine ({} profiles installed)", profiles);
        previous
    }

    /// Decodes against the current generation.
    pub fn decode<'a>(
        &self,
        profile: &ProfileId,
        index: &str,
        subindex: impl Into<SubindexRef<'a>>,
        raw: impl Into<RawValue>,
    ) -> Result<DecodedValue, DecodeFailure> {
        self.current.load().decode(profile, index, subindex, raw)
    }
}
