//! `TPM2_ECC_CURVE` identifiers.

use std::fmt;

/// ECC curve identifier reported with ECC public keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(transparent)
)]
pub struct EccCurve(u16);

impl EccCurve {
    /// No curve.
    pub const NONE: Self = Self(0x0000);
    /// NIST P-192.
    pub const NIST_P192: Self = Self(0x0001);
    /// NIST P-224.
    pub const NIST_P224: Self = Self(0x0002);
    /// NIST P-256.
    pub const NIST_P256: Self = Self(0x0003);
    /// NIST P-384.
    pub const NIST_P384: Self = Self(0x0004);
    /// NIST P-521.
    pub const NIST_P521: Self = Self(0x0005);
    /// Barreto-Naehrig 256-bit curve.
    pub const BN_P256: Self = Self(0x0010);
    /// Barreto-Naehrig 638-bit curve.
    pub const BN_P638: Self = Self(0x0011);
    /// SM2 256-bit curve.
    pub const SM2_P256: Self = Self(0x0020);

    /// Wraps a raw curve id.
    #[must_use]
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    /// Returns the raw curve id.
    #[must_use]
    pub const fn value(self) -> u16 {
        self.0
    }

    /// Returns the registered curve name, if any.
    #[must_use]
    pub const fn name(self) -> Option<&'static str> {
        match self.0 {
            0x0000 => Some("TPM2_ECC_NONE"),
            0x0001 => Some("TPM2_ECC_NIST_P192"),
            0x0002 => Some("TPM2_ECC_NIST_P224"),
            0x0003 => Some("TPM2_ECC_NIST_P256"),
            0x0004 => Some("TPM2_ECC_NIST_P384"),
            0x0005 => Some("TPM2_ECC_NIST_P521"),
            0x0010 => Some("TPM2_ECC_BN_P256"),
            0x0011 => Some("TPM2_ECC_BN_P638"),
            0x0020 => Some("TPM2_ECC_SM2_P256"),
            _ => None,
        }
    }
}

impl From<u16> for EccCurve {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

impl fmt::Display for EccCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{:#06x}", self.0),
        }
    }
}
