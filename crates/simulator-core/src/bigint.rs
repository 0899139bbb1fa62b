//! Big-endian byte sequences, arbitrary-precision integers and `0x` hex.
//!
//! Zero has an empty byte form and the hex form `0x0`.

use num_bigint::BigUint;
use num_traits::{Num, Zero};

use crate::error::ArgumentError;

/// Accumulates big-endian unsigned bytes; `[]` is zero.
#[must_use]
pub fn bytes_to_int(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}

/// Returns the minimal big-endian form, empty for zero.
#[must_use]
pub fn int_to_bytes(value: &BigUint) -> Vec<u8> {
    if value.is_zero() {
        return Vec::new();
    }
    value.to_bytes_be()
}

/// Formats `value` as `0x` followed by lowercase hex digits.
#[must_use]
pub fn to_hex(value: &BigUint) -> String {
    format!("{value:#x}")
}

/// Parses a `0x`/`0X`-prefixed hex string of either digit case.
///
/// # Errors
///
/// Returns [`ArgumentError::MalformedHex`] when the prefix is missing, no
/// digits follow it, or any digit is not hexadecimal.
pub fn from_hex(text: &str) -> Result<BigUint, ArgumentError> {
    let malformed = || ArgumentError::MalformedHex(text.to_owned());
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .ok_or_else(malformed)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(malformed());
    }
    BigUint::from_str_radix(digits, 16).map_err(|_| malformed())
}

/// Drops superfluous leading zero bytes.
#[must_use]
pub fn strip_leading_zeros(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    &bytes[start..]
}

/// Serde adapter writing `BigUint` fields as `0x` hex strings.
#[cfg(feature = "serde")]
pub mod hex_serde {
    use num_bigint::BigUint;
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    /// Serializes through [`super::to_hex`].
    ///
    /// # Errors
    ///
    /// Propagates serializer failures.
    pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::to_hex(value))
    }

    /// Deserializes through [`super::from_hex`].
    ///
    /// # Errors
    ///
    /// Fails on anything that is not a well-formed hex integer string.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        let text = String::deserialize(deserializer)?;
        super::from_hex(&text).map_err(D::Error::custom)
    }
}
