// crates/evis-od/src/selection.rs

//! Choosing which profile applies to a controller.

use crate::error::{DecodeError, ReleaseError};
use crate::types::{PROFILE_EFAST, PROFILE_LEGACY, PROFILE_V2G, ProfileId};
use crate::value::RawValue;
use alloc::collections::BTreeMap;
use alloc::string::ToString;
use core::fmt;

/// Controller firmware family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EvisRelease {
    Legacy,
    Efast,
    V2g,
}

impl EvisRelease {
    /// Derives the release from a software version such as `"4.2.1"`.
    ///
    /// A leading `v` is accepted and missing minor or patch parts count as 0.
    pub fn from_sw_version(version: &str) -> Result<Self, ReleaseError> {
        let invalid = || ReleaseError::InvalidVersion(version.to_string());
        let trimmed = version.trim();
        let trimmed = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);
        if trimmed.is_empty() {
            return Err(invalid());
        }

        let mut parts = [0u32; 3];
        let mut count = 0;
        for part in trimmed.split('.') {
            if count == parts.len() {
                return Err(invalid());
            }
            parts[count] = part.parse().map_err(|_| invalid())?;
            count += 1;
        }

        let version = (parts[0], parts[1], parts[2]);
        Ok(if version >= (5, 0, 0) {
            EvisRelease::V2g
        } else if version >= (4, 0, 0) {
            EvisRelease::Efast
        } else {
            EvisRelease::Legacy
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            EvisRelease::Legacy => PROFILE_LEGACY,
            EvisRelease::Efast => PROFILE_EFAST,
            EvisRelease::V2g => PROFILE_V2G,
        }
    }

    /// Profile id under which this release's variable definitions are loaded.
    pub fn profile_id(self) -> ProfileId {
        ProfileId::from(self.name())
    }
}

impl fmt::Display for EvisRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Maps the protocol identity a charge point reports to a profile.
///
/// The identity is the (`ProtocolType`, `ProtocolVersion`) pair read from
/// `CS_ChargePoint`.
#[derive(Debug, Clone, Default)]
pub struct ProfileSelector {
    bindings: BTreeMap<(i64, i64), ProfileId>,
}

impl ProfileSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a protocol identity to a profile, returning the previous binding.
    pub fn bind(
        &mut self,
        protocol_type: i64,
        protocol_version: i64,
        profile: impl Into<ProfileId>,
    ) -> Option<ProfileId> {
        self.bindings
            .insert((protocol_type, protocol_version), profile.into())
    }

    pub fn select(&self, protocol_type: i64, protocol_version: i64) -> Option<&ProfileId> {
        self.bindings.get(&(protocol_type, protocol_version))
    }

    /// Like [`select`](Self::select), from the raw passthrough values.
    pub fn select_raw(
        &self,
        protocol_type: &RawValue,
        protocol_version: &RawValue,
    ) -> Result<Option<&ProfileId>, DecodeError> {
        Ok(self.select(protocol_type.as_integer()?, protocol_version.as_integer()?))
    }
}
