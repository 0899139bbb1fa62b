//! Reserved handles and well-known NV indices.

use std::fmt;

/// Opaque 32-bit TPM handle.
///
/// Reserved hierarchy and session handles are associated constants; every
/// other value is allocated by the engine and carries no meaning here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(transparent)
)]
pub struct Handle(u32);

impl Handle {
    /// Storage hierarchy.
    pub const RH_OWNER: Self = Self(0x4000_0001);
    /// Null hierarchy.
    pub const RH_NULL: Self = Self(0x4000_0007);
    /// Password authorization session.
    pub const RS_PW: Self = Self(0x4000_0009);
    /// Endorsement hierarchy.
    pub const RH_ENDORSEMENT: Self = Self(0x4000_000B);
    /// Platform hierarchy.
    pub const RH_PLATFORM: Self = Self(0x4000_000C);
    /// NV index holding the RSA endorsement key certificate.
    pub const EK_CERT_NV_INDEX: Self = Self(0x01C0_0002);

    /// Wraps a raw handle.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw handle.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Returns `true` for the four hierarchy handles.
    #[must_use]
    pub const fn is_hierarchy(self) -> bool {
        matches!(
            self,
            Self::RH_OWNER | Self::RH_NULL | Self::RH_ENDORSEMENT | Self::RH_PLATFORM
        )
    }

    /// Returns the reserved name of this handle, if it has one.
    #[must_use]
    pub const fn name(self) -> Option<&'static str> {
        match self {
            Self::RH_OWNER => Some("TPM2_RH_OWNER"),
            Self::RH_NULL => Some("TPM2_RH_NULL"),
            Self::RS_PW => Some("TPM2_RS_PW"),
            Self::RH_ENDORSEMENT => Some("TPM2_RH_ENDORSEMENT"),
            Self::RH_PLATFORM => Some("TPM2_RH_PLATFORM"),
            Self::EK_CERT_NV_INDEX => Some("TPM2_EK_CERT_NV_INDEX"),
            _ => None,
        }
    }
}

impl From<u32> for Handle {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl From<Handle> for u32 {
    fn from(handle: Handle) -> Self {
        handle.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{:#010x}", self.0),
        }
    }
}
