//! `TPM2_ALG_ID` vocabulary.

use std::fmt;

/// Opaque 16-bit TPM algorithm identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(transparent)
)]
pub struct AlgorithmId(u16);

impl AlgorithmId {
    /// Invalid or unspecified algorithm.
    pub const ERROR: Self = Self(0x0000);
    /// RSA asymmetric key.
    pub const RSA: Self = Self(0x0001);
    /// SHA-1 under its legacy spelling.
    pub const SHA: Self = Self(0x0004);
    /// SHA-1 digest.
    pub const SHA1: Self = Self(0x0004);
    /// HMAC signing scheme.
    pub const HMAC: Self = Self(0x0005);
    /// AES block cipher.
    pub const AES: Self = Self(0x0006);
    /// Mask generation function 1.
    pub const MGF1: Self = Self(0x0007);
    /// Keyed-hash object (HMAC key or sealed data).
    pub const KEYEDHASH: Self = Self(0x0008);
    /// XOR obfuscation.
    pub const XOR: Self = Self(0x000A);
    /// SHA-256 digest.
    pub const SHA256: Self = Self(0x000B);
    /// SHA-384 digest.
    pub const SHA384: Self = Self(0x000C);
    /// SHA-512 digest.
    pub const SHA512: Self = Self(0x000D);
    /// No algorithm selected.
    pub const NULL: Self = Self(0x0010);
    /// SM3 digest.
    pub const SM3_256: Self = Self(0x0012);
    /// SM4 block cipher.
    pub const SM4: Self = Self(0x0013);
    /// RSASSA-PKCS1-v1_5 signature scheme.
    pub const RSASSA: Self = Self(0x0014);
    /// RSAES-PKCS1-v1_5 encryption scheme.
    pub const RSAES: Self = Self(0x0015);
    /// RSASSA-PSS signature scheme.
    pub const RSAPSS: Self = Self(0x0016);
    /// RSAES-OAEP encryption scheme.
    pub const OAEP: Self = Self(0x0017);
    /// ECDSA signature scheme.
    pub const ECDSA: Self = Self(0x0018);
    /// ECDH key exchange.
    pub const ECDH: Self = Self(0x0019);
    /// Elliptic-curve direct anonymous attestation.
    pub const ECDAA: Self = Self(0x001A);
    /// SM2 signature scheme.
    pub const SM2: Self = Self(0x001B);
    /// EC-Schnorr signature scheme.
    pub const ECSCHNORR: Self = Self(0x001C);
    /// ECMQV key exchange.
    pub const ECMQV: Self = Self(0x001D);
    /// Concatenation KDF from SP800-56A.
    pub const KDF1_SP800_56A: Self = Self(0x0020);
    /// IEEE 1363a KDF2.
    pub const KDF2: Self = Self(0x0021);
    /// Counter-mode KDF from SP800-108.
    pub const KDF1_SP800_108: Self = Self(0x0022);
    /// Elliptic-curve asymmetric key.
    pub const ECC: Self = Self(0x0023);
    /// Symmetric cipher object.
    pub const SYMCIPHER: Self = Self(0x0025);
    /// Camellia block cipher.
    pub const CAMELLIA: Self = Self(0x0026);
    /// SHA3-256 digest.
    pub const SHA3_256: Self = Self(0x0027);
    /// SHA3-384 digest.
    pub const SHA3_384: Self = Self(0x0028);
    /// SHA3-512 digest.
    pub const SHA3_512: Self = Self(0x0029);
    /// Counter block cipher mode.
    pub const CTR: Self = Self(0x0040);
    /// Output feedback mode.
    pub const OFB: Self = Self(0x0041);
    /// Cipher block chaining mode.
    pub const CBC: Self = Self(0x0042);
    /// Cipher feedback mode.
    pub const CFB: Self = Self(0x0043);
    /// Electronic codebook mode.
    pub const ECB: Self = Self(0x0044);
}

/// Display names for every registered algorithm, in ascending code order.
///
/// `SHA` and `SHA1` share a code; the table carries the `SHA1` spelling.
pub const ALGORITHM_NAMES: &[(AlgorithmId, &str)] = &[
    (AlgorithmId::ERROR, "TPM2_ALG_ERROR"),
    (AlgorithmId::RSA, "TPM2_ALG_RSA"),
    (AlgorithmId::SHA1, "TPM2_ALG_SHA1"),
    (AlgorithmId::HMAC, "TPM2_ALG_HMAC"),
    (AlgorithmId::AES, "TPM2_ALG_AES"),
    (AlgorithmId::MGF1, "TPM2_ALG_MGF1"),
    (AlgorithmId::KEYEDHASH, "TPM2_ALG_KEYEDHASH"),
    (AlgorithmId::XOR, "TPM2_ALG_XOR"),
    (AlgorithmId::SHA256, "TPM2_ALG_SHA256"),
    (AlgorithmId::SHA384, "TPM2_ALG_SHA384"),
    (AlgorithmId::SHA512, "TPM2_ALG_SHA512"),
    (AlgorithmId::NULL, "TPM2_ALG_NULL"),
    (AlgorithmId::SM3_256, "TPM2_ALG_SM3_256"),
    (AlgorithmId::SM4, "TPM2_ALG_SM4"),
    (AlgorithmId::RSASSA, "TPM2_ALG_RSASSA"),
    (AlgorithmId::RSAES, "TPM2_ALG_RSAES"),
    (AlgorithmId::RSAPSS, "TPM2_ALG_RSAPSS"),
    (AlgorithmId::OAEP, "TPM2_ALG_OAEP"),
    (AlgorithmId::ECDSA, "TPM2_ALG_ECDSA"),
    (AlgorithmId::ECDH, "TPM2_ALG_ECDH"),
    (AlgorithmId::ECDAA, "TPM2_ALG_ECDAA"),
    (AlgorithmId::SM2, "TPM2_ALG_SM2"),
    (AlgorithmId::ECSCHNORR, "TPM2_ALG_ECSCHNORR"),
    (AlgorithmId::ECMQV, "TPM2_ALG_ECMQV"),
    (AlgorithmId::KDF1_SP800_56A, "TPM2_ALG_KDF1_SP800_56A"),
    (AlgorithmId::KDF2, "TPM2_ALG_KDF2"),
    (AlgorithmId::KDF1_SP800_108, "TPM2_ALG_KDF1_SP800_108"),
    (AlgorithmId::ECC, "TPM2_ALG_ECC"),
    (AlgorithmId::SYMCIPHER, "TPM2_ALG_SYMCIPHER"),
    (AlgorithmId::CAMELLIA, "TPM2_ALG_CAMELLIA"),
    (AlgorithmId::SHA3_256, "TPM2_ALG_SHA3_256"),
    (AlgorithmId::SHA3_384, "TPM2_ALG_SHA3_384"),
    (AlgorithmId::SHA3_512, "TPM2_ALG_SHA3_512"),
    (AlgorithmId::CTR, "TPM2_ALG_CTR"),
    (AlgorithmId::OFB, "TPM2_ALG_OFB"),
    (AlgorithmId::CBC, "TPM2_ALG_CBC"),
    (AlgorithmId::CFB, "TPM2_ALG_CFB"),
    (AlgorithmId::ECB, "TPM2_ALG_ECB"),
];

impl AlgorithmId {
    /// Wraps a raw wire value.
    #[must_use]
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    /// Returns the raw wire value.
    #[must_use]
    pub const fn value(self) -> u16 {
        self.0
    }

    /// Returns the registered name, if any.
    #[must_use]
    pub fn name(self) -> Option<&'static str> {
        ALGORITHM_NAMES
            .iter()
            .find(|(alg, _)| *alg == self)
            .map(|(_, name)| *name)
    }

    /// Returns `true` for the hash algorithms the engine can use as a name
    /// or KDF digest.
    #[must_use]
    pub const fn is_hash(self) -> bool {
        matches!(
            self.0,
            0x0004 | 0x000B | 0x000C | 0x000D | 0x0012 | 0x0027 | 0x0028 | 0x0029
        )
    }
}

impl From<u16> for AlgorithmId {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

impl From<AlgorithmId> for u16 {
    fn from(alg: AlgorithmId) -> Self {
        alg.0
    }
}

impl fmt::Display for AlgorithmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{:#06x}", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AlgorithmId, ALGORITHM_NAMES};

    #[test]
    fn name_table_is_sorted_and_unique() {
        for pair in ALGORITHM_NAMES.windows(2) {
            assert!(pair[0].0 < pair[1].0, "{} before {}", pair[0].1, pair[1].1);
        }
    }

    #[test]
    fn sha_alias_shares_the_sha1_code() {
        assert_eq!(AlgorithmId::SHA, AlgorithmId::SHA1);
        assert_eq!(AlgorithmId::SHA.name(), Some("TPM2_ALG_SHA1"));
    }

    #[test]
    fn unknown_algorithm_displays_as_hex() {
        assert_eq!(AlgorithmId::new(0x00FF).to_string(), "0x00ff");
        assert_eq!(AlgorithmId::SHA256.to_string(), "TPM2_ALG_SHA256");
    }

    #[test]
    fn hash_classification() {
        assert!(AlgorithmId::SHA256.is_hash());
        assert!(AlgorithmId::SHA3_512.is_hash());
        assert!(!AlgorithmId::RSA.is_hash());
        assert!(!AlgorithmId::HMAC.is_hash());
    }
}
