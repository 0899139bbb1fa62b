//! Coerced command results.
//!
//! General byte data becomes `Vec<u8>`; RSA moduli, ECC coordinates and
//! ECDSA components become [`BigUint`]; object blobs stay [`EngineBuffer`]
//! so they pass back into `load` untouched. With the `serde` feature the
//! integer fields travel as `0x` hex strings.

use num_bigint::BigUint;

use crate::bigint::{bytes_to_int, from_hex, int_to_bytes};
use crate::buffer::{decode, encode_bytes, EngineBuffer};
use crate::engine::{
    RawAttestInfo, RawAuthSession, RawCreatePrimaryResponse, RawCreateResponse, RawImportResponse,
    RawKeyedHash, RawLoadResponse, RawNvPublic, RawQuoteResponse, RawSignature, RawTpmProperties,
};
use crate::error::ArgumentError;
use crate::registry::{AlgorithmId, EccCurve, Handle, StructureTag, GENERATED_VALUE};

/// Primary object created under a hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CreatePrimaryResult {
    /// Handle of the loaded object.
    pub handle: Handle,
    /// RSA modulus; zero for non-RSA objects.
    #[cfg_attr(feature = "serde", serde(with = "crate::bigint::hex_serde"))]
    pub rsa_public_n: BigUint,
    /// ECC public point x; zero for non-ECC objects.
    #[cfg_attr(feature = "serde", serde(with = "crate::bigint::hex_serde"))]
    pub ecc_public_x: BigUint,
    /// ECC public point y; zero for non-ECC objects.
    #[cfg_attr(feature = "serde", serde(with = "crate::bigint::hex_serde"))]
    pub ecc_public_y: BigUint,
    /// Curve of an ECC key.
    pub ecc_curve_id: EccCurve,
    /// `TPM2B_NAME` of the object.
    pub name: Vec<u8>,
    /// Parent name from the creation data.
    pub parent_name: Vec<u8>,
    /// Parent qualified name from the creation data.
    pub parent_qualified_name: Vec<u8>,
}

impl From<RawCreatePrimaryResponse> for CreatePrimaryResult {
    fn from(raw: RawCreatePrimaryResponse) -> Self {
        Self {
            handle: Handle::new(raw.handle),
            rsa_public_n: bytes_to_int(&decode(&raw.rsa_public_n)),
            ecc_public_x: bytes_to_int(&decode(&raw.ecc_public_x)),
            ecc_public_y: bytes_to_int(&decode(&raw.ecc_public_y)),
            ecc_curve_id: EccCurve::new(raw.ecc_curve_id),
            name: decode(&raw.name),
            parent_name: decode(&raw.parent_name),
            parent_qualified_name: decode(&raw.parent_qualified_name),
        }
    }
}

/// Ordinary object created under a loaded parent.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CreateResult {
    /// Wrapped `TPM2B_PRIVATE`, passed to `load` as is.
    pub tpm2b_private: EngineBuffer,
    /// Marshaled `TPM2B_PUBLIC`, passed to `load` as is.
    pub tpm2b_public: EngineBuffer,
    /// RSA modulus; zero for non-RSA objects.
    #[cfg_attr(feature = "serde", serde(with = "crate::bigint::hex_serde"))]
    pub rsa_public_n: BigUint,
    /// ECC public point x; zero for non-ECC objects.
    #[cfg_attr(feature = "serde", serde(with = "crate::bigint::hex_serde"))]
    pub ecc_public_x: BigUint,
    /// ECC public point y; zero for non-ECC objects.
    #[cfg_attr(feature = "serde", serde(with = "crate::bigint::hex_serde"))]
    pub ecc_public_y: BigUint,
    /// Curve of an ECC key.
    pub ecc_curve_id: EccCurve,
    /// Parent name from the creation data.
    pub parent_name: Vec<u8>,
    /// Parent qualified name from the creation data.
    pub parent_qualified_name: Vec<u8>,
}

impl From<RawCreateResponse> for CreateResult {
    fn from(raw: RawCreateResponse) -> Self {
        Self {
            rsa_public_n: bytes_to_int(&decode(&raw.rsa_public_n)),
            ecc_public_x: bytes_to_int(&decode(&raw.ecc_public_x)),
            ecc_public_y: bytes_to_int(&decode(&raw.ecc_public_y)),
            ecc_curve_id: EccCurve::new(raw.ecc_curve_id),
            parent_name: decode(&raw.parent_name),
            parent_qualified_name: decode(&raw.parent_qualified_name),
            tpm2b_private: raw.tpm2b_private,
            tpm2b_public: raw.tpm2b_public,
        }
    }
}

/// Object loaded from a private/public blob pair.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct LoadResult {
    /// Handle of the loaded object.
    pub handle: Handle,
    /// `TPM2B_NAME` of the object.
    pub name: Vec<u8>,
}

impl From<RawLoadResponse> for LoadResult {
    fn from(raw: RawLoadResponse) -> Self {
        Self {
            handle: Handle::new(raw.handle),
            name: decode(&raw.name),
        }
    }
}

/// Signature over the SHA-256 digest of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct SignResult {
    /// `RSASSA` or `ECDSA`.
    pub sign_algo: AlgorithmId,
    /// Digest algorithm of the signed hash.
    pub hash_algo: AlgorithmId,
    /// RSASSA signature; empty for ECDSA.
    pub rsa_ssa_sig: Vec<u8>,
    /// ECDSA `r`; zero for RSASSA.
    #[cfg_attr(feature = "serde", serde(with = "crate::bigint::hex_serde"))]
    pub ecdsa_r: BigUint,
    /// ECDSA `s`; zero for RSASSA.
    #[cfg_attr(feature = "serde", serde(with = "crate::bigint::hex_serde"))]
    pub ecdsa_s: BigUint,
}

impl SignResult {
    /// Rebuilds a signature whose ECDSA components arrive as hex strings.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::MalformedHex`] when either component does not
    /// parse.
    pub fn from_hex_parts(
        sign_algo: AlgorithmId,
        hash_algo: AlgorithmId,
        rsa_ssa_sig: Vec<u8>,
        ecdsa_r: &str,
        ecdsa_s: &str,
    ) -> Result<Self, ArgumentError> {
        Ok(Self {
            sign_algo,
            hash_algo,
            rsa_ssa_sig,
            ecdsa_r: from_hex(ecdsa_r)?,
            ecdsa_s: from_hex(ecdsa_s)?,
        })
    }

    /// Re-encodes the signature into fresh engine buffers.
    #[must_use]
    pub fn to_raw(&self) -> RawSignature {
        RawSignature {
            sign_algo: self.sign_algo.value(),
            hash_algo: self.hash_algo.value(),
            rsa_ssa_sig: encode_bytes(&self.rsa_ssa_sig),
            ecdsa_r: encode_bytes(&int_to_bytes(&self.ecdsa_r)),
            ecdsa_s: encode_bytes(&int_to_bytes(&self.ecdsa_s)),
        }
    }
}

impl From<RawSignature> for SignResult {
    fn from(raw: RawSignature) -> Self {
        Self {
            sign_algo: AlgorithmId::new(raw.sign_algo),
            hash_algo: AlgorithmId::new(raw.hash_algo),
            rsa_ssa_sig: decode(&raw.rsa_ssa_sig),
            ecdsa_r: bytes_to_int(&decode(&raw.ecdsa_r)),
            ecdsa_s: bytes_to_int(&decode(&raw.ecdsa_s)),
        }
    }
}

/// Signed attestation over selected PCRs.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct QuoteResult {
    /// Signature scheme used.
    pub sign_algo: AlgorithmId,
    /// Digest algorithm of the signed hash.
    pub hash_algo: AlgorithmId,
    /// RSASSA signature over `tpm2b_attest`.
    pub rsa_ssa_sig: Vec<u8>,
    /// Marshaled `TPMS_ATTEST`.
    pub tpm2b_attest: Vec<u8>,
}

impl From<RawQuoteResponse> for QuoteResult {
    fn from(raw: RawQuoteResponse) -> Self {
        Self {
            sign_algo: AlgorithmId::new(raw.sign_algo),
            hash_algo: AlgorithmId::new(raw.hash_algo),
            rsa_ssa_sig: decode(&raw.rsa_ssa_sig),
            tpm2b_attest: decode(&raw.tpm2b_attest),
        }
    }
}

/// Duplicated object re-wrapped under a new parent.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ImportResult {
    /// Wrapped `TPM2B_PRIVATE`, passed to `load` as is.
    pub tpm2b_private: EngineBuffer,
    /// Marshaled `TPM2B_PUBLIC`, passed to `load` as is.
    pub tpm2b_public: EngineBuffer,
}

impl From<RawImportResponse> for ImportResult {
    fn from(raw: RawImportResponse) -> Self {
        Self {
            tpm2b_private: raw.tpm2b_private,
            tpm2b_public: raw.tpm2b_public,
        }
    }
}

/// Fixed TPM properties.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct TpmProperties {
    /// Specification revision times 100.
    pub spec_version: u32,
    /// Four-character vendor id, e.g. `"IBM "`.
    pub manufacturer_id: String,
}

impl From<RawTpmProperties> for TpmProperties {
    fn from(raw: RawTpmProperties) -> Self {
        Self {
            spec_version: raw.spec_version,
            manufacturer_id: raw.manufacturer_id,
        }
    }
}

/// Public attributes of an NV index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct NvPublic {
    /// Size of the index data area.
    pub data_size: u16,
}

impl From<RawNvPublic> for NvPublic {
    fn from(raw: RawNvPublic) -> Self {
        Self {
            data_size: raw.data_size,
        }
    }
}

/// Policy or trial session.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct AuthSession {
    /// Session handle.
    pub handle: Handle,
    /// Nonce generated by the TPM.
    pub nonce_tpm: Vec<u8>,
}

impl From<RawAuthSession> for AuthSession {
    fn from(raw: RawAuthSession) -> Self {
        Self {
            handle: Handle::new(raw.handle),
            nonce_tpm: decode(&raw.nonce_tpm),
        }
    }
}

/// Decoded fields of a `TPMS_ATTEST`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct AttestInfo {
    /// Should be [`GENERATED_VALUE`].
    pub magic: u32,
    /// Attestation structure tag.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub attest_type: StructureTag,
    /// Qualified name of the signing key.
    pub signer_qualified_name: Vec<u8>,
    /// Caller qualifying data echoed back.
    pub nonce: Vec<u8>,
    /// PCR digest; only set for quotes.
    pub selected_pcr_digest: Vec<u8>,
}

impl AttestInfo {
    /// Returns `true` when the structure was produced inside a TPM.
    #[must_use]
    pub const fn is_generated(&self) -> bool {
        self.magic == GENERATED_VALUE
    }
}

impl From<RawAttestInfo> for AttestInfo {
    fn from(raw: RawAttestInfo) -> Self {
        Self {
            magic: raw.magic,
            attest_type: StructureTag::new(raw.attest_type),
            signer_qualified_name: decode(&raw.signer_qualified_name),
            nonce: decode(&raw.nonce),
            selected_pcr_digest: decode(&raw.selected_pcr_digest),
        }
    }
}

/// Externally built keyed-hash object ready for import.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct KeyedHashBlob {
    /// Marshaled `TPM2B_SENSITIVE`.
    pub tpm2b_private: EngineBuffer,
    /// Marshaled `TPM2B_PUBLIC`.
    pub tpm2b_public: EngineBuffer,
    /// Name computed from the public area.
    pub name: Vec<u8>,
}

impl From<RawKeyedHash> for KeyedHashBlob {
    fn from(raw: RawKeyedHash) -> Self {
        Self {
            name: decode(&raw.name),
            tpm2b_private: raw.tpm2b_private,
            tpm2b_public: raw.tpm2b_public,
        }
    }
}
