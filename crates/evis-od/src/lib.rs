#![cfg_attr(not(feature = "std"), no_std)]
#![doc = "Schema-driven decoding of EV charging controller object dictionary telemetry."]

// 'alloc' is used for the owned schema and table data
extern crate alloc;

// --- Foundation Modules ---
pub mod error;
pub mod types;
pub mod value;
pub(crate) mod log;

// --- Resolution Strategies ---
pub mod custom;
pub mod lookup;
pub mod scaling;

// --- Schema and Decoding ---
pub mod engine;
pub mod schema;

// --- Session Helpers ---
pub mod monitor;
#[cfg(feature = "std")]
pub mod reload;
pub mod selection;

// --- Top-level Exports ---
pub use custom::{CustomDecoderRegistry, CustomValue, DecoderFn, ExtendedError, FaultWord};
pub use engine::{DecodeEngine, DecodedField};
pub use error::{
    DecodeError, DecodeFailure, LookupError, NotFound, ReleaseError, ScaleError, SchemaError,
};
pub use lookup::{LookupTable, LookupTableStore};
pub use monitor::{MonitorConfig, Observation, TelemetryMonitor};
#[cfg(feature = "std")]
pub use reload::SharedEngine;
pub use scaling::{Quantity, scale, unscale};
pub use schema::{
    DescriptorSource, IndexDefinition, IndexSource, Profile, ProfileSource, Resolution,
    SchemaRegistry, SubindexDescriptor,
};
pub use selection::{EvisRelease, ProfileSelector};
pub use types::{ProfileId, SubindexRef};
pub use value::{DecodedValue, EnumCode, RawValue};
