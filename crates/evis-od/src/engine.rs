// crates/evis-od/src/engine.rs

//! The decode entry point.

use crate::error::{DecodeError, DecodeFailure, NotFound};
use crate::log::{DecodeContext, my_debug, my_error};
use crate::lookup::LookupTableStore;
use crate::scaling;
use crate::schema::{Resolution, SchemaRegistry, SubindexDescriptor};
use crate::types::{ProfileId, SubindexRef};
use crate::value::{DecodedValue, RawValue};
use alloc::string::ToString;
use alloc::sync::Arc;
use alloc::vec::Vec;

/// One field of a decoded record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedField {
    /// Zero-based position within the record.
    pub position: usize,
    /// Subindex name, or `None` for raws past the end of the index definition.
    pub name: Option<Arc<str>>,
    pub value: Result<DecodedValue, DecodeFailure>,
}

/// Decodes raw object-dictionary values against installed profiles.
///
/// The engine is immutable once built. Decoding takes `&self`, never locks and
/// never mutates the schema or tables, so one engine can be shared across
/// threads behind an `Arc`.
#[derive(Debug, Clone)]
pub struct DecodeEngine {
    schema: SchemaRegistry,
}

impl DecodeEngine {
    pub fn new(schema: SchemaRegistry) -> Self {
        DecodeEngine { schema }
    }

    pub fn schema(&self) -> &SchemaRegistry {
        &self.schema
    }

    pub fn tables(&self) -> &LookupTableStore {
        self.schema.tables()
    }

    /// Decodes one raw value.
    ///
    /// Unknown enumeration codes are not failures: they come back as
    /// [`DecodedValue::Unrecognized`] carrying the original code.
    pub fn decode<'a>(
        &self,
        profile: &ProfileId,
        index: &str,
        subindex: impl Into<SubindexRef<'a>>,
        raw: impl Into<RawValue>,
    ) -> Result<DecodedValue, DecodeFailure> {
        let subindex = subindex.into();
        let descriptor = self.schema.descriptor(profile.as_str(), index, subindex)?;
        let ctx = DecodeContext::field(profile.as_str(), index, subindex);
        self.apply(ctx, descriptor, raw.into())
    }

    /// Decodes a positional record: `raws[i]` is the value of subindex `i`.
    ///
    /// Every field gets its own result. A malformed field does not affect its
    /// siblings, and raws past the last defined subindex are `NotFound`.
    pub fn decode_record<I>(
        &self,
        profile: &ProfileId,
        index: &str,
        raws: I,
    ) -> Result<Vec<DecodedField>, DecodeFailure>
    where
        I: IntoIterator,
        I::Item: Into<RawValue>,
    {
        let definition = self.schema.get_index(profile.as_str(), index)?;
        let fields = raws
            .into_iter()
            .enumerate()
            .map(|(position, raw)| match definition.subindex(position) {
                Some(descriptor) => {
                    let ctx = DecodeContext::field(
                        profile.as_str(),
                        index,
                        SubindexRef::Name(&descriptor.name),
                    );
                    DecodedField {
                        position,
                        name: Some(descriptor.name.clone()),
                        value: self.apply(ctx, descriptor, raw.into()),
                    }
                }
                None => DecodedField {
                    position,
                    name: None,
                    value: Err(DecodeFailure::NotFound(NotFound::Subindex {
                        profile: profile.clone(),
                        index: index.to_string(),
                        subindex: SubindexRef::Position(position).to_string(),
                    })),
                },
            })
            .collect();
        Ok(fields)
    }

    fn apply(
        &self,
        ctx: DecodeContext<'_>,
        descriptor: &SubindexDescriptor,
        raw: RawValue,
    ) -> Result<DecodedValue, DecodeFailure> {
        let malformed = |source: DecodeError| {
            my_error!(ctx, "Malformed input {}: {}", raw, source);
            DecodeFailure::MalformedInput {
                index: ctx.index.unwrap_or_default().to_string(),
                subindex: descriptor.name.to_string(),
                source,
            }
        };

        match &descriptor.resolution {
            Resolution::Passthrough => Ok(DecodedValue::Raw(raw)),
            Resolution::Lookup { table_name, table } => {
                let code = raw.as_integer().map_err(malformed)?;
                match table.label(code) {
                    Some(label) => Ok(DecodedValue::Label {
                        code,
                        label: label.clone(),
                    }),
                    None => {
                        my_debug!(ctx, "Code {} not present in table '{}'", code, table_name);
                        Ok(DecodedValue::Unrecognized { code })
                    }
                }
            }
            Resolution::Custom { decoder, .. } => decoder(&raw, self.schema.tables())
                .map(DecodedValue::Custom)
                .map_err(malformed),
            Resolution::Scaled { unit, factor } => {
                let value = raw.as_integer().map_err(malformed)?;
                Ok(DecodedValue::Quantity(scaling::scale(value, unit.clone(), *factor)))
            }
        }
    }
}
