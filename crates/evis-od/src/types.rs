use alloc::string::String;
use alloc::sync::Arc;
use core::borrow::Borrow;
use core::fmt;

// --- Well-known profile names ---

/// Profile used by controllers older than the EFAST software line.
pub const PROFILE_LEGACY: &str = "legacy";
/// Profile used by EFAST controllers (software 4.x).
pub const PROFILE_EFAST: &str = "efast";
/// Profile used by V2G-capable controllers (software 5.x and newer).
pub const PROFILE_V2G: &str = "v2g";

// --- Well-known dictionary names ---

/// Charge point record; carries status, errors and the protocol identity of the session.
pub const CHARGE_POINT_INDEX: &str = "CS_ChargePoint";
/// Passthrough subindex of `CS_ChargePoint` naming the wire protocol.
pub const PROTOCOL_TYPE_SUBINDEX: &str = "ProtocolType";
/// Passthrough subindex of `CS_ChargePoint` naming the wire protocol revision.
pub const PROTOCOL_VERSION_SUBINDEX: &str = "ProtocolVersion";

/// Identifies an installed profile.
///
/// Profiles are always selected explicitly by this identifier, never by the
/// document they were loaded from or by load order. The newtype keeps profile
/// names from being mixed up with index or table names.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProfileId(Arc<str>);

impl ProfileId {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        ProfileId(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProfileId {
    fn from(name: &str) -> Self {
        ProfileId(Arc::from(name))
    }
}

impl From<String> for ProfileId {
    fn from(name: String) -> Self {
        ProfileId(Arc::from(name))
    }
}

impl Borrow<str> for ProfileId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Selects a subindex inside an index definition.
///
/// `Position` is the zero-based position of the field within the raw record,
/// which is also its position in the schema document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubindexRef<'a> {
    Name(&'a str),
    Position(usize),
}

impl<'a> From<&'a str> for SubindexRef<'a> {
    fn from(name: &'a str) -> Self {
        SubindexRef::Name(name)
    }
}

impl<'a> From<&'a String> for SubindexRef<'a> {
    fn from(name: &'a String) -> Self {
        SubindexRef::Name(name.as_str())
    }
}

impl From<usize> for SubindexRef<'_> {
    fn from(position: usize) -> Self {
        SubindexRef::Position(position)
    }
}

impl fmt::Display for SubindexRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubindexRef::Name(name) => f.write_str(name),
            SubindexRef::Position(position) => write!(f, "#{}", position),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::collections::BTreeMap;
    use alloc::string::ToString;

    #[test]
    fn test_profile_id_borrows_as_str() {
        let mut profiles = BTreeMap::new();
        profiles.insert(ProfileId::from(PROFILE_V2G), 1);
        assert_eq!(profiles.get("v2g"), Some(&1));
        assert_eq!(profiles.get("efast"), None);
    }

    #[test]
    fn test_subindex_ref_display() {
        assert_eq!(SubindexRef::from("CP_StatusCode").to_string(), "CP_StatusCode");
        assert_eq!(SubindexRef::from(3usize).to_string(), "#3");
    }
}
