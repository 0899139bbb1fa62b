//! `TPM2_ST` structure tags and the attestation magic.

use std::fmt;

/// Magic value that opens every TPM-generated attestation structure.
pub const GENERATED_VALUE: u32 = 0xFF54_4347;

/// Structure tag found in attestation and ticket structures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(transparent)
)]
pub struct StructureTag(u16);

impl StructureTag {
    /// Attestation of NV index contents.
    pub const ATTEST_NV: Self = Self(0x8014);
    /// Attestation of a command audit digest.
    pub const ATTEST_COMMAND_AUDIT: Self = Self(0x8015);
    /// Attestation of a session audit digest.
    pub const ATTEST_SESSION_AUDIT: Self = Self(0x8016);
    /// Attestation that an object is loaded.
    pub const ATTEST_CERTIFY: Self = Self(0x8017);
    /// Attestation of PCR values.
    pub const ATTEST_QUOTE: Self = Self(0x8018);
    /// Attestation of clock and time.
    pub const ATTEST_TIME: Self = Self(0x8019);
    /// Attestation of object creation data.
    pub const ATTEST_CREATION: Self = Self(0x801A);
    /// Reserved attestation tag.
    pub const RESERVED3: Self = Self(0x801B);
    /// Creation ticket.
    pub const CREATION: Self = Self(0x8021);
    /// Signature verification ticket.
    pub const VERIFIED: Self = Self(0x8022);
    /// `PolicySecret` ticket.
    pub const AUTH_SECRET: Self = Self(0x8023);
    /// Hash check ticket.
    pub const HASHCHECK: Self = Self(0x8024);
    /// `PolicySigned` ticket.
    pub const AUTH_SIGNED: Self = Self(0x8025);
    /// Field upgrade manifest.
    pub const FU_MANIFEST: Self = Self(0x8029);

    /// Wraps a raw tag.
    #[must_use]
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    /// Returns the raw tag.
    #[must_use]
    pub const fn value(self) -> u16 {
        self.0
    }

    /// Returns `true` for the `TPM2_ST_ATTEST_*` family.
    #[must_use]
    pub const fn is_attestation(self) -> bool {
        self.0 >= Self::ATTEST_NV.0 && self.0 <= Self::ATTEST_CREATION.0
    }

    /// Returns the registered tag name, if any.
    #[must_use]
    pub const fn name(self) -> Option<&'static str> {
        match self.0 {
            0x8014 => Some("TPM2_ST_ATTEST_NV"),
            0x8015 => Some("TPM2_ST_ATTEST_COMMAND_AUDIT"),
            0x8016 => Some("TPM2_ST_ATTEST_SESSION_AUDIT"),
            0x8017 => Some("TPM2_ST_ATTEST_CERTIFY"),
            0x8018 => Some("TPM2_ST_ATTEST_QUOTE"),
            0x8019 => Some("TPM2_ST_ATTEST_TIME"),
            0x801A => Some("TPM2_ST_ATTEST_CREATION"),
            0x801B => Some("TPM2_ST_RESERVED3"),
            0x8021 => Some("TPM2_ST_CREATION"),
            0x8022 => Some("TPM2_ST_VERIFIED"),
            0x8023 => Some("TPM2_ST_AUTH_SECRET"),
            0x8024 => Some("TPM2_ST_HASHCHECK"),
            0x8025 => Some("TPM2_ST_AUTH_SIGNED"),
            0x8029 => Some("TPM2_ST_FU_MANIFEST"),
            _ => None,
        }
    }
}

impl From<u16> for StructureTag {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

impl fmt::Display for StructureTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{:#06x}", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::StructureTag;

    #[test]
    fn attestation_family_bounds() {
        assert!(StructureTag::ATTEST_NV.is_attestation());
        assert!(StructureTag::ATTEST_QUOTE.is_attestation());
        assert!(StructureTag::ATTEST_CREATION.is_attestation());
        assert!(!StructureTag::RESERVED3.is_attestation());
        assert!(!StructureTag::CREATION.is_attestation());
    }
}
