//! Per-command argument structs.
//!
//! Optional inputs carry their documented defaults through `Default`; with
//! the `serde` feature a missing field deserializes to the same default.

use crate::buffer::ByteSource;
use crate::error::ArgumentError;
use crate::registry::{AlgorithmId, Handle};

/// Number of PCRs addressable by a selection mask.
pub const PCR_SELECT_MAX: u8 = 24;

/// Inputs to [`crate::Tpm::create_primary`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(default)
)]
pub struct CreatePrimaryArgs {
    /// Hierarchy the primary object is created under.
    pub hierarchy: Handle,
    /// Object type: RSA, ECC, SYMCIPHER or KEYEDHASH.
    pub algorithm: AlgorithmId,
    /// Key may only sign or decrypt TPM-internal data.
    pub restricted: bool,
    /// Key may decrypt.
    pub decrypt: bool,
    /// Key may sign.
    pub sign: bool,
    /// Caller-chosen unique field that seeds key derivation.
    pub unique: ByteSource,
    /// Authorization value of the new object.
    pub user_auth: ByteSource,
    /// Data sealed into a keyed-hash object.
    pub sensitive_data: ByteSource,
    /// Policy digest gating use of the object; empty for none.
    pub auth_policy: Vec<u8>,
}

impl Default for CreatePrimaryArgs {
    fn default() -> Self {
        Self {
            hierarchy: Handle::RH_OWNER,
            algorithm: AlgorithmId::RSA,
            restricted: true,
            decrypt: true,
            sign: false,
            unique: ByteSource::default(),
            user_auth: ByteSource::default(),
            sensitive_data: ByteSource::default(),
            auth_policy: Vec::new(),
        }
    }
}

/// Inputs to [`crate::Tpm::create`]; the parent handle is passed separately.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(default)
)]
pub struct CreateArgs {
    /// Object type: RSA, ECC, SYMCIPHER or KEYEDHASH.
    pub algorithm: AlgorithmId,
    /// Key may only sign or decrypt TPM-internal data.
    pub restricted: bool,
    /// Key may decrypt.
    pub decrypt: bool,
    /// Key may sign.
    pub sign: bool,
    /// Caller-chosen unique field.
    pub unique: ByteSource,
    /// Authorization value of the new object.
    pub user_auth: ByteSource,
    /// Data sealed into a keyed-hash object.
    pub sensitive_data: ByteSource,
    /// Policy digest gating use of the object; empty for none.
    pub auth_policy: Vec<u8>,
}

impl Default for CreateArgs {
    fn default() -> Self {
        Self {
            algorithm: AlgorithmId::RSA,
            restricted: true,
            decrypt: false,
            sign: true,
            unique: ByteSource::default(),
            user_auth: ByteSource::default(),
            sensitive_data: ByteSource::default(),
            auth_policy: Vec::new(),
        }
    }
}

/// Inputs to [`crate::Tpm::sign`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(default)
)]
pub struct SignArgs {
    /// `RSASSA` or `ECDSA`.
    pub scheme: AlgorithmId,
    /// Message whose SHA-256 digest is signed.
    pub message: ByteSource,
}

impl Default for SignArgs {
    fn default() -> Self {
        Self {
            scheme: AlgorithmId::RSASSA,
            message: ByteSource::default(),
        }
    }
}

impl SignArgs {
    /// Checks that the engine can produce `scheme`.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::UnsupportedScheme`] for anything other than
    /// `RSASSA` and `ECDSA`.
    pub fn checked_scheme(&self) -> Result<AlgorithmId, ArgumentError> {
        match self.scheme {
            AlgorithmId::RSASSA | AlgorithmId::ECDSA => Ok(self.scheme),
            other => Err(ArgumentError::UnsupportedScheme(other)),
        }
    }
}

/// Inputs to [`crate::Tpm::quote`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(default)
)]
pub struct QuoteArgs {
    /// PCR indices to quote, each below [`PCR_SELECT_MAX`].
    pub pcr_selection: Vec<u8>,
    /// Caller nonce echoed in the attestation.
    pub qualifying_data: ByteSource,
}

impl Default for QuoteArgs {
    fn default() -> Self {
        Self {
            pcr_selection: vec![0, 1, 2, 3],
            qualifying_data: ByteSource::default(),
        }
    }
}

impl QuoteArgs {
    /// Folds the selection into a 24-bit PCR mask.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::PcrIndexOutOfRange`] for an index of 24 or
    /// above.
    pub fn pcr_mask(&self) -> Result<u32, ArgumentError> {
        self.pcr_selection.iter().try_fold(0_u32, |mask, &index| {
            if index >= PCR_SELECT_MAX {
                return Err(ArgumentError::PcrIndexOutOfRange(index));
            }
            Ok(mask | (1 << index))
        })
    }
}

/// Inputs to [`crate::Tpm::nv_read`]. `size` has no default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct NvReadArgs {
    /// Number of bytes to read.
    pub size: u16,
    /// Byte offset into the index.
    #[cfg_attr(feature = "serde", serde(default))]
    pub offset: u16,
}

impl NvReadArgs {
    /// Reads `size` bytes from the start of the index.
    #[must_use]
    pub const fn new(size: u16) -> Self {
        Self { size, offset: 0 }
    }
}

/// Inputs to [`crate::Tpm::import`]; the parent handle is passed separately.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(default)
)]
pub struct ImportArgs {
    /// Marshaled `TPM2B_PUBLIC` of the object being imported.
    pub public_area: Vec<u8>,
    /// Outer HMAC over the duplicate.
    pub integrity_hmac: ByteSource,
    /// Wrapped sensitive area.
    pub encrypted_private: ByteSource,
    /// Seed protected by the parent's public key.
    pub encrypted_seed: ByteSource,
    /// Inner wrapper algorithm; `NULL` when the duplicate has no inner wrap.
    pub symmetric_alg: AlgorithmId,
    /// Inner wrapper key; empty when `symmetric_alg` is `NULL`.
    pub encryption_key: ByteSource,
}

impl Default for ImportArgs {
    fn default() -> Self {
        Self {
            public_area: Vec::new(),
            integrity_hmac: ByteSource::default(),
            encrypted_private: ByteSource::default(),
            encrypted_seed: ByteSource::default(),
            symmetric_alg: AlgorithmId::NULL,
            encryption_key: ByteSource::default(),
        }
    }
}

/// Inputs to [`crate::Tpm::kdfa`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(default)
)]
pub struct KdfArgs {
    /// HMAC hash driving the derivation.
    pub hash: AlgorithmId,
    /// Secret key; must not be empty.
    pub key: ByteSource,
    /// Usage label without terminator; must not be empty.
    pub label: ByteSource,
    /// First optional context value.
    pub context_u: ByteSource,
    /// Second optional context value.
    pub context_v: ByteSource,
    /// Requested output length in bits.
    pub bits: u32,
}

impl Default for KdfArgs {
    fn default() -> Self {
        Self {
            hash: AlgorithmId::SHA256,
            key: ByteSource::default(),
            label: ByteSource::default(),
            context_u: ByteSource::default(),
            context_v: ByteSource::default(),
            bits: 256,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{QuoteArgs, SignArgs};
    use crate::error::ArgumentError;
    use crate::registry::AlgorithmId;

    #[test]
    fn default_quote_selects_first_four_pcrs() {
        assert_eq!(QuoteArgs::default().pcr_mask(), Ok(0b1111));
    }

    #[test]
    fn pcr_selection_beyond_mask_is_rejected() {
        let args = QuoteArgs {
            pcr_selection: vec![1, 24],
            ..QuoteArgs::default()
        };
        assert_eq!(args.pcr_mask(), Err(ArgumentError::PcrIndexOutOfRange(24)));
    }

    #[test]
    fn only_rsassa_and_ecdsa_are_signable() {
        assert_eq!(SignArgs::default().checked_scheme(), Ok(AlgorithmId::RSASSA));
        let args = SignArgs {
            scheme: AlgorithmId::RSAPSS,
            ..SignArgs::default()
        };
        assert_eq!(
            args.checked_scheme(),
            Err(ArgumentError::UnsupportedScheme(AlgorithmId::RSAPSS))
        );
    }
}
