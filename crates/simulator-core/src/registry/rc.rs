//! `TPM2_RC` vocabulary and structural decomposition.
//!
//! Layout of the low twelve bits (TPM 2.0 Part 2, section 6.6):
//!
//! ```text
//! format 0:  S . T . V F E E E E E E E   (F = 0)
//! format 1:  N N N N F P E E E E E E     (F = 1)
//! ```
//!
//! Bits above the low twelve carry the TSS layer and pass through
//! decomposition untouched.

use std::fmt;

/// Bit set in every format-1 code.
pub const RC_FMT1: u32 = 0x080;
/// Bit set in every TPM 2.0 format-0 code.
pub const RC_VER1: u32 = 0x100;
/// Severity bit marking a format-0 warning.
pub const RC_WARN_BIT: u32 = 0x800;
/// Format-1 parameter marker.
pub const RC_P_BIT: u32 = 0x040;

const LOW_MASK: u32 = 0x0FFF;
const FMT1_BASE_MASK: u32 = 0x0BF;
const FMT1_NUMBER_SHIFT: u32 = 8;
const FMT1_NUMBER_MASK: u32 = 0xF00;
const SESSION_NUMBER_FLAG: u32 = 0x8;

/// 32-bit TPM response code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(transparent)
)]
pub struct ResponseCode(u32);

impl ResponseCode {
    /// Command completed.
    pub const SUCCESS: Self = Self(0x000);
    /// Command tag is not a TPM 1.2 or 2.0 tag.
    pub const BAD_TAG: Self = Self(0x01E);

    /// Start of format-0 version 1 codes.
    pub const VER1: Self = Self(RC_VER1);
    /// TPM not initialized by `TPM2_Startup`.
    pub const INITIALIZE: Self = Self(RC_VER1 + 0x000);
    /// TPM is in failure mode.
    pub const FAILURE: Self = Self(RC_VER1 + 0x001);
    /// Improper use of a sequence handle.
    pub const SEQUENCE: Self = Self(RC_VER1 + 0x003);
    /// Not currently used.
    pub const PRIVATE: Self = Self(RC_VER1 + 0x00B);
    /// Not currently used.
    pub const HMAC: Self = Self(RC_VER1 + 0x019);
    /// Command is disabled.
    pub const DISABLED: Self = Self(RC_VER1 + 0x020);
    /// Command failed because audit sequence is required exclusivity.
    pub const EXCLUSIVE: Self = Self(RC_VER1 + 0x021);
    /// Authorization handle is not correct for the command.
    pub const AUTH_TYPE: Self = Self(RC_VER1 + 0x024);
    /// Command requires an authorization session.
    pub const AUTH_MISSING: Self = Self(RC_VER1 + 0x025);
    /// Policy failure in math operation or an invalid `authPolicy` value.
    pub const POLICY: Self = Self(RC_VER1 + 0x026);
    /// PCR check failed.
    pub const PCR: Self = Self(RC_VER1 + 0x027);
    /// PCR have changed since checked.
    pub const PCR_CHANGED: Self = Self(RC_VER1 + 0x028);
    /// TPM is in field upgrade mode.
    pub const UPGRADE: Self = Self(RC_VER1 + 0x02D);
    /// Context ID counter is at maximum.
    pub const TOO_MANY_CONTEXTS: Self = Self(RC_VER1 + 0x02E);
    /// `authValue` or `authPolicy` is not available for the handle.
    pub const AUTH_UNAVAILABLE: Self = Self(RC_VER1 + 0x02F);
    /// TPM is waiting for a reset after a field upgrade.
    pub const REBOOT: Self = Self(RC_VER1 + 0x030);
    /// Symmetric key is weaker than the session digest.
    pub const UNBALANCED: Self = Self(RC_VER1 + 0x031);
    /// Command size does not match the bytes received.
    pub const COMMAND_SIZE: Self = Self(RC_VER1 + 0x042);
    /// Command code not supported.
    pub const COMMAND_CODE: Self = Self(RC_VER1 + 0x043);
    /// Authorization size is out of range or does not match the sessions.
    pub const AUTHSIZE: Self = Self(RC_VER1 + 0x044);
    /// Command cannot have an authorization session.
    pub const AUTH_CONTEXT: Self = Self(RC_VER1 + 0x045);
    /// NV offset plus size is out of range.
    pub const NV_RANGE: Self = Self(RC_VER1 + 0x046);
    /// Requested NV allocation size is larger than allowed.
    pub const NV_SIZE: Self = Self(RC_VER1 + 0x047);
    /// NV access locked.
    pub const NV_LOCKED: Self = Self(RC_VER1 + 0x048);
    /// NV access authorization fails in command actions.
    pub const NV_AUTHORIZATION: Self = Self(RC_VER1 + 0x049);
    /// NV index has not been written.
    pub const NV_UNINITIALIZED: Self = Self(RC_VER1 + 0x04A);
    /// Insufficient space for NV allocation.
    pub const NV_SPACE: Self = Self(RC_VER1 + 0x04B);
    /// NV index is already defined.
    pub const NV_DEFINED: Self = Self(RC_VER1 + 0x04C);
    /// Context in `TPM2_ContextLoad` is not valid.
    pub const BAD_CONTEXT: Self = Self(RC_VER1 + 0x050);
    /// `cpHash` value already set or not correct for use.
    pub const CPHASH: Self = Self(RC_VER1 + 0x051);
    /// Handle for parent is not a valid parent.
    pub const PARENT: Self = Self(RC_VER1 + 0x052);
    /// Function needs testing.
    pub const NEEDS_TEST: Self = Self(RC_VER1 + 0x053);
    /// Internal function cannot process a request due to an unspecified problem.
    pub const NO_RESULT: Self = Self(RC_VER1 + 0x054);
    /// Sensitive area did not unmarshal correctly after decryption.
    pub const SENSITIVE: Self = Self(RC_VER1 + 0x055);
    /// Largest format-0 version 1 code.
    pub const MAX_FM0: Self = Self(RC_VER1 + 0x07F);

    /// Start of format-1 codes.
    pub const FMT1: Self = Self(RC_FMT1);
    /// Asymmetric algorithm not supported or not correct.
    pub const ASYMMETRIC: Self = Self(RC_FMT1 + 0x001);
    /// Inconsistent attributes.
    pub const ATTRIBUTES: Self = Self(RC_FMT1 + 0x002);
    /// Hash algorithm not supported or not appropriate.
    pub const HASH: Self = Self(RC_FMT1 + 0x003);
    /// Value is out of range or not correct for the context.
    pub const VALUE: Self = Self(RC_FMT1 + 0x004);
    /// Hierarchy is not enabled or not correct for use.
    pub const HIERARCHY: Self = Self(RC_FMT1 + 0x005);
    /// Key size is not supported.
    pub const KEY_SIZE: Self = Self(RC_FMT1 + 0x007);
    /// Mask generation function not supported.
    pub const MGF: Self = Self(RC_FMT1 + 0x008);
    /// Mode of operation not supported.
    pub const MODE: Self = Self(RC_FMT1 + 0x009);
    /// Type of the handle is not correct for use.
    pub const TYPE: Self = Self(RC_FMT1 + 0x00A);
    /// Handle is not correct for use.
    pub const HANDLE: Self = Self(RC_FMT1 + 0x00B);
    /// Unsupported key derivation function.
    pub const KDF: Self = Self(RC_FMT1 + 0x00C);
    /// Value was out of allowed range.
    pub const RANGE: Self = Self(RC_FMT1 + 0x00D);
    /// Authorization HMAC check failed and DA counter incremented.
    pub const AUTH_FAIL: Self = Self(RC_FMT1 + 0x00E);
    /// Invalid nonce size or nonce value mismatch.
    pub const NONCE: Self = Self(RC_FMT1 + 0x00F);
    /// Authorization requires assertion of physical presence.
    pub const PP: Self = Self(RC_FMT1 + 0x010);
    /// Unsupported or incompatible scheme.
    pub const SCHEME: Self = Self(RC_FMT1 + 0x012);
    /// Structure is the wrong size.
    pub const SIZE: Self = Self(RC_FMT1 + 0x015);
    /// Unsupported symmetric algorithm or key size.
    pub const SYMMETRIC: Self = Self(RC_FMT1 + 0x016);
    /// Incorrect structure tag.
    pub const TAG: Self = Self(RC_FMT1 + 0x017);
    /// Union selector is incorrect.
    pub const SELECTOR: Self = Self(RC_FMT1 + 0x018);
    /// Input buffer too short to unmarshal the value.
    pub const INSUFFICIENT: Self = Self(RC_FMT1 + 0x01A);
    /// Signature is not valid.
    pub const SIGNATURE: Self = Self(RC_FMT1 + 0x01B);
    /// Key fields are not compatible with the selected use.
    pub const KEY: Self = Self(RC_FMT1 + 0x01C);
    /// Policy check failed.
    pub const POLICY_FAIL: Self = Self(RC_FMT1 + 0x01D);
    /// Integrity check failed.
    pub const INTEGRITY: Self = Self(RC_FMT1 + 0x01F);
    /// Invalid ticket.
    pub const TICKET: Self = Self(RC_FMT1 + 0x020);
    /// Reserved bits not set to zero as required.
    pub const RESERVED_BITS: Self = Self(RC_FMT1 + 0x021);
    /// Authorization failure without DA implications.
    pub const BAD_AUTH: Self = Self(RC_FMT1 + 0x022);
    /// Policy has expired.
    pub const EXPIRED: Self = Self(RC_FMT1 + 0x023);
    /// Command code in the policy is not the command being authorized.
    pub const POLICY_CC: Self = Self(RC_FMT1 + 0x024);
    /// Public and sensitive portions of an object are not cryptographically bound.
    pub const BINDING: Self = Self(RC_FMT1 + 0x025);
    /// Curve not supported.
    pub const CURVE: Self = Self(RC_FMT1 + 0x026);
    /// Point is not on the required curve.
    pub const ECC_POINT: Self = Self(RC_FMT1 + 0x027);

    /// Start of warning codes.
    pub const WARN: Self = Self(0x900);
    /// Gap for context ID is too large.
    pub const CONTEXT_GAP: Self = Self(0x900 + 0x001);
    /// Out of memory for object contexts.
    pub const OBJECT_MEMORY: Self = Self(0x900 + 0x002);
    /// Out of memory for session contexts.
    pub const SESSION_MEMORY: Self = Self(0x900 + 0x003);
    /// Out of shared object or session memory.
    pub const MEMORY: Self = Self(0x900 + 0x004);
    /// Out of session handles.
    pub const SESSION_HANDLES: Self = Self(0x900 + 0x005);
    /// Out of object handles.
    pub const OBJECT_HANDLES: Self = Self(0x900 + 0x006);
    /// Bad locality.
    pub const LOCALITY: Self = Self(0x900 + 0x007);
    /// TPM suspended processing of the command.
    pub const YIELDED: Self = Self(0x900 + 0x008);
    /// Command was canceled.
    pub const CANCELED: Self = Self(0x900 + 0x009);
    /// TPM is performing self tests.
    pub const TESTING: Self = Self(0x900 + 0x00A);
    /// Handle 0 references a transient object that is not loaded.
    pub const REFERENCE_H0: Self = Self(0x900 + 0x010);
    /// Handle 1 references a transient object that is not loaded.
    pub const REFERENCE_H1: Self = Self(0x900 + 0x011);
    /// Handle 2 references a transient object that is not loaded.
    pub const REFERENCE_H2: Self = Self(0x900 + 0x012);
    /// Handle 3 references a transient object that is not loaded.
    pub const REFERENCE_H3: Self = Self(0x900 + 0x013);
    /// Handle 4 references a transient object that is not loaded.
    pub const REFERENCE_H4: Self = Self(0x900 + 0x014);
    /// Handle 5 references a transient object that is not loaded.
    pub const REFERENCE_H5: Self = Self(0x900 + 0x015);
    /// Handle 6 references a transient object that is not loaded.
    pub const REFERENCE_H6: Self = Self(0x900 + 0x016);
    /// Session 0 references a session that is not loaded.
    pub const REFERENCE_S0: Self = Self(0x900 + 0x018);
    /// Session 1 references a session that is not loaded.
    pub const REFERENCE_S1: Self = Self(0x900 + 0x019);
    /// Session 2 references a session that is not loaded.
    pub const REFERENCE_S2: Self = Self(0x900 + 0x01A);
    /// Session 3 references a session that is not loaded.
    pub const REFERENCE_S3: Self = Self(0x900 + 0x01B);
    /// Session 4 references a session that is not loaded.
    pub const REFERENCE_S4: Self = Self(0x900 + 0x01C);
    /// Session 5 references a session that is not loaded.
    pub const REFERENCE_S5: Self = Self(0x900 + 0x01D);
    /// Session 6 references a session that is not loaded.
    pub const REFERENCE_S6: Self = Self(0x900 + 0x01E);
    /// NV is rate limiting.
    pub const NV_RATE: Self = Self(0x900 + 0x020);
    /// Authorizations are locked out for dictionary attack protection.
    pub const LOCKOUT: Self = Self(0x900 + 0x021);
    /// TPM was not able to start the command.
    pub const RETRY: Self = Self(0x900 + 0x022);
    /// NV is not available.
    pub const NV_UNAVAILABLE: Self = Self(0x900 + 0x023);
    /// Largest warning code.
    pub const NOT_USED: Self = Self(0x900 + 0x07F);
}

/// Offsets added to a format-1 base to name the offending entity.
pub mod offset {
    /// Handle entity.
    pub const H: u32 = 0x000;
    /// Parameter entity.
    pub const P: u32 = 0x040;
    /// Session entity.
    pub const S: u32 = 0x800;
    /// Entity number 1.
    pub const N1: u32 = 0x100;
    /// Entity number 2.
    pub const N2: u32 = 0x200;
    /// Entity number 3.
    pub const N3: u32 = 0x300;
    /// Entity number 4.
    pub const N4: u32 = 0x400;
    /// Entity number 5.
    pub const N5: u32 = 0x500;
    /// Entity number 6.
    pub const N6: u32 = 0x600;
    /// Entity number 7.
    pub const N7: u32 = 0x700;
    /// Entity number 8.
    pub const N8: u32 = 0x800;
    /// Entity number 9.
    pub const N9: u32 = 0x900;
    /// Entity number 10.
    pub const NA: u32 = 0xA00;
    /// Entity number 11.
    pub const NB: u32 = 0xB00;
    /// Entity number 12.
    pub const NC: u32 = 0xC00;
    /// Entity number 13.
    pub const ND: u32 = 0xD00;
    /// Entity number 14.
    pub const NE: u32 = 0xE00;
    /// Entity number 15.
    pub const NF: u32 = 0xF00;
}

/// Display names for registered base codes.
pub const RESPONSE_CODE_NAMES: &[(ResponseCode, &str)] = &[
    (ResponseCode::SUCCESS, "TPM2_RC_SUCCESS"),
    (ResponseCode::BAD_TAG, "TPM2_RC_BAD_TAG"),
    (ResponseCode::INITIALIZE, "TPM2_RC_INITIALIZE"),
    (ResponseCode::FAILURE, "TPM2_RC_FAILURE"),
    (ResponseCode::SEQUENCE, "TPM2_RC_SEQUENCE"),
    (ResponseCode::PRIVATE, "TPM2_RC_PRIVATE"),
    (ResponseCode::HMAC, "TPM2_RC_HMAC"),
    (ResponseCode::DISABLED, "TPM2_RC_DISABLED"),
    (ResponseCode::EXCLUSIVE, "TPM2_RC_EXCLUSIVE"),
    (ResponseCode::AUTH_TYPE, "TPM2_RC_AUTH_TYPE"),
    (ResponseCode::AUTH_MISSING, "TPM2_RC_AUTH_MISSING"),
    (ResponseCode::POLICY, "TPM2_RC_POLICY"),
    (ResponseCode::PCR, "TPM2_RC_PCR"),
    (ResponseCode::PCR_CHANGED, "TPM2_RC_PCR_CHANGED"),
    (ResponseCode::UPGRADE, "TPM2_RC_UPGRADE"),
    (ResponseCode::TOO_MANY_CONTEXTS, "TPM2_RC_TOO_MANY_CONTEXTS"),
    (ResponseCode::AUTH_UNAVAILABLE, "TPM2_RC_AUTH_UNAVAILABLE"),
    (ResponseCode::REBOOT, "TPM2_RC_REBOOT"),
    (ResponseCode::UNBALANCED, "TPM2_RC_UNBALANCED"),
    (ResponseCode::COMMAND_SIZE, "TPM2_RC_COMMAND_SIZE"),
    (ResponseCode::COMMAND_CODE, "TPM2_RC_COMMAND_CODE"),
    (ResponseCode::AUTHSIZE, "TPM2_RC_AUTHSIZE"),
    (ResponseCode::AUTH_CONTEXT, "TPM2_RC_AUTH_CONTEXT"),
    (ResponseCode::NV_RANGE, "TPM2_RC_NV_RANGE"),
    (ResponseCode::NV_SIZE, "TPM2_RC_NV_SIZE"),
    (ResponseCode::NV_LOCKED, "TPM2_RC_NV_LOCKED"),
    (ResponseCode::NV_AUTHORIZATION, "TPM2_RC_NV_AUTHORIZATION"),
    (ResponseCode::NV_UNINITIALIZED, "TPM2_RC_NV_UNINITIALIZED"),
    (ResponseCode::NV_SPACE, "TPM2_RC_NV_SPACE"),
    (ResponseCode::NV_DEFINED, "TPM2_RC_NV_DEFINED"),
    (ResponseCode::BAD_CONTEXT, "TPM2_RC_BAD_CONTEXT"),
    (ResponseCode::CPHASH, "TPM2_RC_CPHASH"),
    (ResponseCode::PARENT, "TPM2_RC_PARENT"),
    (ResponseCode::NEEDS_TEST, "TPM2_RC_NEEDS_TEST"),
    (ResponseCode::NO_RESULT, "TPM2_RC_NO_RESULT"),
    (ResponseCode::SENSITIVE, "TPM2_RC_SENSITIVE"),
    (ResponseCode::MAX_FM0, "TPM2_RC_MAX_FM0"),
    (ResponseCode::ASYMMETRIC, "TPM2_RC_ASYMMETRIC"),
    (ResponseCode::ATTRIBUTES, "TPM2_RC_ATTRIBUTES"),
    (ResponseCode::HASH, "TPM2_RC_HASH"),
    (ResponseCode::VALUE, "TPM2_RC_VALUE"),
    (ResponseCode::HIERARCHY, "TPM2_RC_HIERARCHY"),
    (ResponseCode::KEY_SIZE, "TPM2_RC_KEY_SIZE"),
    (ResponseCode::MGF, "TPM2_RC_MGF"),
    (ResponseCode::MODE, "TPM2_RC_MODE"),
    (ResponseCode::TYPE, "TPM2_RC_TYPE"),
    (ResponseCode::HANDLE, "TPM2_RC_HANDLE"),
    (ResponseCode::KDF, "TPM2_RC_KDF"),
    (ResponseCode::RANGE, "TPM2_RC_RANGE"),
    (ResponseCode::AUTH_FAIL, "TPM2_RC_AUTH_FAIL"),
    (ResponseCode::NONCE, "TPM2_RC_NONCE"),
    (ResponseCode::PP, "TPM2_RC_PP"),
    (ResponseCode::SCHEME, "TPM2_RC_SCHEME"),
    (ResponseCode::SIZE, "TPM2_RC_SIZE"),
    (ResponseCode::SYMMETRIC, "TPM2_RC_SYMMETRIC"),
    (ResponseCode::TAG, "TPM2_RC_TAG"),
    (ResponseCode::SELECTOR, "TPM2_RC_SELECTOR"),
    (ResponseCode::INSUFFICIENT, "TPM2_RC_INSUFFICIENT"),
    (ResponseCode::SIGNATURE, "TPM2_RC_SIGNATURE"),
    (ResponseCode::KEY, "TPM2_RC_KEY"),
    (ResponseCode::POLICY_FAIL, "TPM2_RC_POLICY_FAIL"),
    (ResponseCode::INTEGRITY, "TPM2_RC_INTEGRITY"),
    (ResponseCode::TICKET, "TPM2_RC_TICKET"),
    (ResponseCode::RESERVED_BITS, "TPM2_RC_RESERVED_BITS"),
    (ResponseCode::BAD_AUTH, "TPM2_RC_BAD_AUTH"),
    (ResponseCode::EXPIRED, "TPM2_RC_EXPIRED"),
    (ResponseCode::POLICY_CC, "TPM2_RC_POLICY_CC"),
    (ResponseCode::BINDING, "TPM2_RC_BINDING"),
    (ResponseCode::CURVE, "TPM2_RC_CURVE"),
    (ResponseCode::ECC_POINT, "TPM2_RC_ECC_POINT"),
    (ResponseCode::CONTEXT_GAP, "TPM2_RC_CONTEXT_GAP"),
    (ResponseCode::OBJECT_MEMORY, "TPM2_RC_OBJECT_MEMORY"),
    (ResponseCode::SESSION_MEMORY, "TPM2_RC_SESSION_MEMORY"),
    (ResponseCode::MEMORY, "TPM2_RC_MEMORY"),
    (ResponseCode::SESSION_HANDLES, "TPM2_RC_SESSION_HANDLES"),
    (ResponseCode::OBJECT_HANDLES, "TPM2_RC_OBJECT_HANDLES"),
    (ResponseCode::LOCALITY, "TPM2_RC_LOCALITY"),
    (ResponseCode::YIELDED, "TPM2_RC_YIELDED"),
    (ResponseCode::CANCELED, "TPM2_RC_CANCELED"),
    (ResponseCode::TESTING, "TPM2_RC_TESTING"),
    (ResponseCode::REFERENCE_H0, "TPM2_RC_REFERENCE_H0"),
    (ResponseCode::REFERENCE_H1, "TPM2_RC_REFERENCE_H1"),
    (ResponseCode::REFERENCE_H2, "TPM2_RC_REFERENCE_H2"),
    (ResponseCode::REFERENCE_H3, "TPM2_RC_REFERENCE_H3"),
    (ResponseCode::REFERENCE_H4, "TPM2_RC_REFERENCE_H4"),
    (ResponseCode::REFERENCE_H5, "TPM2_RC_REFERENCE_H5"),
    (ResponseCode::REFERENCE_H6, "TPM2_RC_REFERENCE_H6"),
    (ResponseCode::REFERENCE_S0, "TPM2_RC_REFERENCE_S0"),
    (ResponseCode::REFERENCE_S1, "TPM2_RC_REFERENCE_S1"),
    (ResponseCode::REFERENCE_S2, "TPM2_RC_REFERENCE_S2"),
    (ResponseCode::REFERENCE_S3, "TPM2_RC_REFERENCE_S3"),
    (ResponseCode::REFERENCE_S4, "TPM2_RC_REFERENCE_S4"),
    (ResponseCode::REFERENCE_S5, "TPM2_RC_REFERENCE_S5"),
    (ResponseCode::REFERENCE_S6, "TPM2_RC_REFERENCE_S6"),
    (ResponseCode::NV_RATE, "TPM2_RC_NV_RATE"),
    (ResponseCode::LOCKOUT, "TPM2_RC_LOCKOUT"),
    (ResponseCode::RETRY, "TPM2_RC_RETRY"),
    (ResponseCode::NV_UNAVAILABLE, "TPM2_RC_NV_UNAVAILABLE"),
    (ResponseCode::NOT_USED, "TPM2_RC_NOT_USED"),
];

/// Entity a format-1 code points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum RcSubject {
    /// Handle index `1..=7` in the handle area.
    Handle(u8),
    /// Authorization session index; `0..=7` encodes `N = 8..=15`.
    Session(u8),
    /// Command parameter index `0..=15`.
    Parameter(u8),
}

impl fmt::Display for RcSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Handle(n) => write!(f, "handle {n}"),
            Self::Session(n) => write!(f, "session {n}"),
            Self::Parameter(n) => write!(f, "parameter {n}"),
        }
    }
}

/// Structural parts of a response code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RcParts {
    /// Bits above the low twelve (TSS layer), carried verbatim.
    pub layer: u32,
    /// Format-0 severity bit.
    pub is_warning: bool,
    /// Format-1 marker.
    pub is_format1: bool,
    /// Base code: the low bits with warning and positional bits removed.
    pub base: ResponseCode,
    /// Offending entity of a format-1 code, when one is encoded.
    pub subject: Option<RcSubject>,
}

impl RcParts {
    /// Reassembles the original response code.
    #[must_use]
    pub const fn recompose(self) -> ResponseCode {
        let mut raw = self.layer | self.base.0;
        if self.is_warning {
            raw |= RC_WARN_BIT;
        }
        if let Some(subject) = self.subject {
            raw |= match subject {
                RcSubject::Handle(n) => (n as u32 & 0x7) << FMT1_NUMBER_SHIFT,
                RcSubject::Session(n) => {
                    ((n as u32 & 0x7) | SESSION_NUMBER_FLAG) << FMT1_NUMBER_SHIFT
                }
                RcSubject::Parameter(n) => RC_P_BIT | ((n as u32 & 0xF) << FMT1_NUMBER_SHIFT),
            };
        }
        ResponseCode(raw)
    }
}

impl ResponseCode {
    /// Wraps a raw code.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw code.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Returns `true` for `TPM2_RC_SUCCESS`.
    #[must_use]
    pub const fn is_success(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` when the format-1 bit is set.
    #[must_use]
    pub const fn is_format1(self) -> bool {
        self.0 & RC_FMT1 != 0
    }

    /// Returns `true` for format-0 warning codes.
    #[must_use]
    pub const fn is_warning(self) -> bool {
        !self.is_format1() && self.0 & RC_WARN_BIT != 0
    }

    /// Splits the code into layer, severity, format, base and subject.
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub const fn decompose(self) -> RcParts {
        let layer = self.0 & !LOW_MASK;
        let low = self.0 & LOW_MASK;

        if low & RC_FMT1 == 0 {
            return RcParts {
                layer,
                is_warning: low & RC_WARN_BIT != 0,
                is_format1: false,
                base: Self(low & !RC_WARN_BIT),
                subject: None,
            };
        }

        let number = (low & FMT1_NUMBER_MASK) >> FMT1_NUMBER_SHIFT;
        let subject = if low & RC_P_BIT != 0 {
            Some(RcSubject::Parameter(number as u8))
        } else if number == 0 {
            None
        } else if number & SESSION_NUMBER_FLAG != 0 {
            Some(RcSubject::Session((number & 0x7) as u8))
        } else {
            Some(RcSubject::Handle(number as u8))
        };

        RcParts {
            layer,
            is_warning: false,
            is_format1: true,
            base: Self(low & FMT1_BASE_MASK),
            subject,
        }
    }

    /// Returns the base code with positional and severity bits removed.
    #[must_use]
    pub const fn base(self) -> Self {
        self.decompose().base
    }

    /// Looks up the registered name of this exact code.
    #[must_use]
    pub fn name(self) -> Option<&'static str> {
        RESPONSE_CODE_NAMES
            .iter()
            .find(|(rc, _)| *rc == self)
            .map(|(_, name)| *name)
    }
}

impl From<u32> for ResponseCode {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl From<ResponseCode> for u32 {
    fn from(rc: ResponseCode) -> Self {
        rc.0
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = self.name() {
            return f.write_str(name);
        }
        let parts = self.decompose();
        let full_base = if parts.is_warning {
            Self(parts.base.0 | RC_WARN_BIT)
        } else {
            parts.base
        };
        match (full_base.name(), parts.subject) {
            (Some(name), Some(subject)) if parts.layer == 0 => write!(f, "{name} ({subject})"),
            (Some(name), None) if parts.layer == 0 => f.write_str(name),
            _ => write!(f, "{:#010x}", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{offset, RcSubject, ResponseCode, RESPONSE_CODE_NAMES};

    #[test]
    fn warning_codes_decompose_into_version_base() {
        let parts = ResponseCode::LOCKOUT.decompose();
        assert!(parts.is_warning);
        assert!(!parts.is_format1);
        assert_eq!(parts.base, ResponseCode::new(0x121));
        assert_eq!(parts.recompose(), ResponseCode::LOCKOUT);
    }

    #[test]
    fn bad_hash_parameter_names_parameter_one() {
        let rc = ResponseCode::new(offset::P + offset::N1 + ResponseCode::HASH.value());
        assert_eq!(rc.value(), 0x1C3);
        let parts = rc.decompose();
        assert!(parts.is_format1);
        assert_eq!(parts.base, ResponseCode::HASH);
        assert_eq!(parts.subject, Some(RcSubject::Parameter(1)));
        assert_eq!(rc.to_string(), "TPM2_RC_HASH (parameter 1)");
    }

    #[test]
    fn handle_and_session_offsets_are_distinguished() {
        let handle = ResponseCode::new(ResponseCode::HANDLE.value() + offset::N2);
        assert_eq!(handle.decompose().subject, Some(RcSubject::Handle(2)));

        let session = ResponseCode::new(ResponseCode::AUTH_FAIL.value() + offset::S + offset::N1);
        assert_eq!(session.decompose().subject, Some(RcSubject::Session(1)));
        assert_eq!(session.to_string(), "TPM2_RC_AUTH_FAIL (session 1)");
    }

    #[test]
    fn success_is_plain_format_zero() {
        let parts = ResponseCode::SUCCESS.decompose();
        assert!(!parts.is_warning && !parts.is_format1);
        assert_eq!(parts.subject, None);
        assert!(ResponseCode::SUCCESS.is_success());
    }

    #[test]
    fn unknown_code_displays_as_hex() {
        assert_eq!(ResponseCode::new(0x0008_0001).to_string(), "0x00080001");
    }

    #[test]
    fn every_named_code_is_its_own_base() {
        let range_markers = [ResponseCode::MAX_FM0, ResponseCode::NOT_USED];
        for (rc, name) in RESPONSE_CODE_NAMES
            .iter()
            .filter(|(rc, _)| !range_markers.contains(rc))
        {
            let parts = rc.decompose();
            assert_eq!(parts.subject, None, "{name}");
            assert_eq!(parts.recompose(), *rc, "{name}");
        }
    }
}
