// crates/evis-od/src/custom/mod.rs

//! Named decoding capabilities for fields that are neither plain lookups nor
//! scaled numbers.
//!
//! Profiles refer to decoders by name (`lookup_func`). The registry is filled
//! before any profile is loaded, and a profile naming an unknown decoder is
//! rejected at load time.

pub mod extended_error;

pub use extended_error::{
    ChargePointInterface, EXTENDED_ERROR_FUNCTION, ExtendedError, FAULT_WORD_FUNCTION, FaultWord,
};

use crate::error::{DecodeError, DecodeFailure};
use crate::lookup::LookupTableStore;
use crate::value::{DecodedValue, RawValue};
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

/// Signature of a custom decoder.
///
/// Decoders are pure: they see the raw value and read-only tables, nothing else.
pub type DecoderFn = fn(&RawValue, &LookupTableStore) -> Result<CustomValue, DecodeError>;

/// Structured output of a custom decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomValue {
    ExtendedError(ExtendedError),
    FaultWord(FaultWord),
    /// Generic named fields, for decoders injected by the caller.
    Fields(Vec<(String, DecodedValue)>),
    Text(String),
}

impl fmt::Display for CustomValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomValue::ExtendedError(e) => write!(f, "{}", e),
            CustomValue::FaultWord(w) => write!(f, "{}", w),
            CustomValue::Fields(fields) => {
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}={}", name, value)?;
                }
                Ok(())
            }
            CustomValue::Text(text) => f.write_str(text),
        }
    }
}

/// Capability table from function name to decoder.
#[derive(Debug, Clone, Default)]
pub struct CustomDecoderRegistry {
    decoders: BTreeMap<String, DecoderFn>,
}

impl CustomDecoderRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the decoders the controller firmware families share:
    /// the extended error word and the emergency fault word.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(EXTENDED_ERROR_FUNCTION, extended_error::decode_extended_error);
        registry.register(FAULT_WORD_FUNCTION, extended_error::decode_fault_word);
        registry
    }

    /// Registers `decoder` under `name`, replacing any decoder of that name.
    pub fn register(&mut self, name: impl Into<String>, decoder: DecoderFn) {
        self.decoders.insert(name.into(), decoder);
    }

    pub fn get(&self, name: &str) -> Option<DecoderFn> {
        self.decoders.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.decoders.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.decoders.keys().map(String::as_str).collect()
    }

    /// Runs the decoder registered as `name` on `raw`.
    ///
    /// Decoder errors surface as `MalformedInput`; the index and subindex are
    /// left empty since the registry does not know which field it decodes.
    pub fn invoke(
        &self,
        name: &str,
        raw: &RawValue,
        tables: &LookupTableStore,
    ) -> Result<CustomValue, DecodeFailure> {
        let decoder = self
            .get(name)
            .ok_or_else(|| DecodeFailure::UnregisteredCapability {
                function: name.to_string(),
            })?;
        decoder(raw, tables).map_err(|source| DecodeFailure::MalformedInput {
            index: String::new(),
            subindex: String::new(),
            source,
        })
    }
}
