// crates/evis-od/src/schema/mod.rs

//! Loading and validation of variable-definition profiles.
//!
//! A [`SchemaRegistry`] is built on top of a frozen [`LookupTableStore`] and
//! [`CustomDecoderRegistry`]. Every table and decoder a profile names must be
//! registered before the profile is loaded; loading then resolves those names
//! once so that decoding never searches a registry again.

mod profile;
mod source;

pub use profile::{IndexDefinition, Profile, Resolution, ResolutionKind, SubindexDescriptor};
pub use source::{DescriptorSource, IndexSource, ProfileSource};

use crate::custom::CustomDecoderRegistry;
use crate::error::{NotFound, SchemaError};
use crate::log::{DecodeContext, my_error, my_info};
use crate::lookup::LookupTableStore;
use crate::types::{ProfileId, SubindexRef};
use alloc::collections::{BTreeMap, BTreeSet};
use alloc::collections::btree_map::Entry;
use alloc::string::ToString;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::num::NonZeroU32;

/// Holds every installed profile, keyed by [`ProfileId`].
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    tables: Arc<LookupTableStore>,
    decoders: Arc<CustomDecoderRegistry>,
    profiles: BTreeMap<ProfileId, Profile>,
}

impl SchemaRegistry {
    pub fn new(tables: Arc<LookupTableStore>, decoders: Arc<CustomDecoderRegistry>) -> Self {
        SchemaRegistry {
            tables,
            decoders,
            profiles: BTreeMap::new(),
        }
    }

    /// Validates `source` and installs it as profile `id`.
    ///
    /// Loading is all or nothing: on error the registry is unchanged and
    /// profiles installed earlier remain usable.
    pub fn load(
        &mut self,
        id: impl Into<ProfileId>,
        source: ProfileSource,
    ) -> Result<&Profile, SchemaError> {
        let id = id.into();
        let ctx = DecodeContext::profile(id.as_str());
        let profile = match self.build_profile(&id, source) {
            Ok(profile) => profile,
            Err(e) => {
                my_error!(ctx, "Rejected profile: {}", e);
                return Err(e);
            }
        };
        my_info!(
            ctx,
            "Installed profile (version {}, {} indexes)",
            profile.version.as_deref().unwrap_or("unversioned"),
            profile.len()
        );
        match self.profiles.entry(id) {
            Entry::Vacant(slot) => Ok(slot.insert(profile)),
            Entry::Occupied(slot) => Err(SchemaError::DuplicateProfile(slot.key().clone())),
        }
    }

    fn build_profile(&self, id: &ProfileId, source: ProfileSource) -> Result<Profile, SchemaError> {
        if id.as_str().is_empty() {
            return Err(SchemaError::EmptyProfileId);
        }
        if self.profiles.contains_key(id) {
            return Err(SchemaError::DuplicateProfile(id.clone()));
        }

        let mut indexes = BTreeMap::new();
        for index in source.indexes {
            if index.name.is_empty() {
                return Err(SchemaError::EmptyIndexName);
            }
            let name: Arc<str> = Arc::from(index.name.as_str());
            if indexes.contains_key(&name) {
                return Err(SchemaError::DuplicateIndex { index: index.name });
            }
            let subindexes = self.build_subindexes(&index.name, index.subindexes)?;
            indexes.insert(name.clone(), IndexDefinition::new(name, subindexes));
        }

        Ok(Profile {
            id: id.clone(),
            version: source.version,
            indexes,
        })
    }

    fn build_subindexes(
        &self,
        index: &str,
        sources: Vec<DescriptorSource>,
    ) -> Result<Vec<SubindexDescriptor>, SchemaError> {
        let mut seen = BTreeSet::new();
        let mut descriptors = Vec::with_capacity(sources.len());
        for (position, source) in sources.iter().enumerate() {
            if source.subindex_name.is_empty() {
                return Err(SchemaError::EmptySubindexName {
                    index: index.to_string(),
                });
            }
            if !seen.insert(source.subindex_name.as_str()) {
                return Err(SchemaError::DuplicateSubindex {
                    index: index.to_string(),
                    subindex: source.subindex_name.clone(),
                });
            }
            descriptors.push(SubindexDescriptor {
                name: Arc::from(source.subindex_name.as_str()),
                position,
                resolution: self.resolve_descriptor(index, source)?,
            });
        }
        Ok(descriptors)
    }

    /// Enforces the single-resolution-mode invariant and binds the named
    /// table or decoder.
    fn resolve_descriptor(
        &self,
        index: &str,
        source: &DescriptorSource,
    ) -> Result<Resolution, SchemaError> {
        let field = || (index.to_string(), source.subindex_name.clone());

        let scaled = source.unit.is_some() || source.factor.is_some();
        let modes = [source.lookup_name.is_some(), source.lookup_func.is_some(), scaled];
        if modes.iter().filter(|m| **m).count() > 1 {
            let (index, subindex) = field();
            return Err(SchemaError::AmbiguousResolution { index, subindex });
        }

        if let Some(table_name) = &source.lookup_name {
            let table = self.tables.get(table_name).ok_or_else(|| {
                let (index, subindex) = field();
                SchemaError::UnknownLookupTable {
                    index,
                    subindex,
                    table: table_name.clone(),
                }
            })?;
            return Ok(Resolution::Lookup {
                table_name: Arc::from(table_name.as_str()),
                table: table.clone(),
            });
        }

        if let Some(function) = &source.lookup_func {
            let decoder = self.decoders.get(function).ok_or_else(|| {
                let (index, subindex) = field();
                SchemaError::UnregisteredCapability {
                    index,
                    subindex,
                    function: function.clone(),
                }
            })?;
            return Ok(Resolution::Custom {
                function: Arc::from(function.as_str()),
                decoder,
            });
        }

        match (&source.unit, source.factor) {
            (None, None) => Ok(Resolution::Passthrough),
            (Some(_), None) => {
                let (index, subindex) = field();
                Err(SchemaError::UnitWithoutFactor { index, subindex })
            }
            (None, Some(_)) => {
                let (index, subindex) = field();
                Err(SchemaError::FactorWithoutUnit { index, subindex })
            }
            (Some(unit), Some(factor)) => {
                if unit.is_empty() {
                    let (index, subindex) = field();
                    return Err(SchemaError::EmptyUnit { index, subindex });
                }
                let factor = u32::try_from(factor)
                    .ok()
                    .and_then(NonZeroU32::new)
                    .ok_or_else(|| {
                        let (index, subindex) = field();
                        SchemaError::InvalidFactor {
                            index,
                            subindex,
                            factor,
                        }
                    })?;
                Ok(Resolution::Scaled {
                    unit: Arc::from(unit.as_str()),
                    factor,
                })
            }
        }
    }

    pub fn profile(&self, id: &str) -> Result<&Profile, NotFound> {
        self.profiles
            .get(id)
            .ok_or_else(|| NotFound::Profile(ProfileId::from(id)))
    }

    pub fn get_index(&self, profile: &str, index: &str) -> Result<&IndexDefinition, NotFound> {
        self.profile(profile)?
            .index(index)
            .ok_or_else(|| NotFound::Index {
                profile: ProfileId::from(profile),
                index: index.to_string(),
            })
    }

    /// Finds the descriptor for a subindex, by name or zero-based position.
    pub fn descriptor<'a>(
        &self,
        profile: &str,
        index: &str,
        subindex: impl Into<SubindexRef<'a>>,
    ) -> Result<&SubindexDescriptor, NotFound> {
        let subindex = subindex.into();
        self.get_index(profile, index)?
            .subindex(subindex)
            .ok_or_else(|| NotFound::Subindex {
                profile: ProfileId::from(profile),
                index: index.to_string(),
                subindex: subindex.to_string(),
            })
    }

    pub fn tables(&self) -> &Arc<LookupTableStore> {
        &self.tables
    }

    pub fn decoders(&self) -> &Arc<CustomDecoderRegistry> {
        &self.decoders
    }

    pub fn profile_ids(&self) -> impl Iterator<Item = &ProfileId> {
        self.profiles.keys()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.profiles.contains_key(id)
    }
}
