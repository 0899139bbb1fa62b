//! Conversion between plain bytes or strings and engine-side buffers.
//!
//! Every encode builds a fresh [`EngineBuffer`]; inputs are only borrowed, so
//! no buffer is ever shared between two engine calls.

use crate::error::ArgumentError;

/// Largest payload a TPM2B size prefix can describe.
pub const MAX_TPM2B_LEN: usize = u16::MAX as usize;

/// Ordered bytes owned by the engine side of the boundary.
///
/// Built empty and filled one element at a time, read back by declared
/// length, mirroring the engine's byte-vector class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(transparent)
)]
pub struct EngineBuffer(Vec<u8>);

impl EngineBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends one element.
    pub fn push(&mut self, byte: u8) {
        self.0.push(byte);
    }

    /// Returns the declared length.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when the buffer holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reads the element at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<u8> {
        self.0.get(index).copied()
    }

    /// Borrows the contents for bridging to a foreign buffer type.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

/// Byte-typed input supplied either as text or as raw bytes.
///
/// Text is encoded one byte per character code. With the `serde` feature it
/// deserializes from a string, a byte buffer or a sequence of numbers, and
/// `null` reads as empty text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(untagged))]
pub enum ByteSource {
    /// Character string; every code point must be at most `0xFF`.
    Text(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
}

impl Default for ByteSource {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl From<&str> for ByteSource {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for ByteSource {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<u8>> for ByteSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<&[u8]> for ByteSource {
    fn from(bytes: &[u8]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ByteSource {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ByteSourceVisitor)
    }
}

#[cfg(feature = "serde")]
struct ByteSourceVisitor;

#[cfg(feature = "serde")]
impl<'de> serde::de::Visitor<'de> for ByteSourceVisitor {
    type Value = ByteSource;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("a string, a byte array or a sequence of bytes")
    }

    fn visit_str<E: serde::de::Error>(self, text: &str) -> Result<ByteSource, E> {
        Ok(ByteSource::Text(text.to_owned()))
    }

    fn visit_string<E: serde::de::Error>(self, text: String) -> Result<ByteSource, E> {
        Ok(ByteSource::Text(text))
    }

    fn visit_bytes<E: serde::de::Error>(self, bytes: &[u8]) -> Result<ByteSource, E> {
        Ok(ByteSource::Bytes(bytes.to_vec()))
    }

    fn visit_byte_buf<E: serde::de::Error>(self, bytes: Vec<u8>) -> Result<ByteSource, E> {
        Ok(ByteSource::Bytes(bytes))
    }

    fn visit_unit<E: serde::de::Error>(self) -> Result<ByteSource, E> {
        Ok(ByteSource::default())
    }

    fn visit_none<E: serde::de::Error>(self) -> Result<ByteSource, E> {
        Ok(ByteSource::default())
    }

    fn visit_seq<A: serde::de::SeqAccess<'de>>(self, mut seq: A) -> Result<ByteSource, A::Error> {
        let mut bytes = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(byte) = seq.next_element::<u8>()? {
            bytes.push(byte);
        }
        Ok(ByteSource::Bytes(bytes))
    }
}

/// Copies `bytes` into a fresh engine buffer, preserving order.
#[must_use]
pub fn encode_bytes(bytes: &[u8]) -> EngineBuffer {
    let mut buffer = EngineBuffer::new();
    for &byte in bytes {
        buffer.push(byte);
    }
    buffer
}

/// Copies a text or byte input into a fresh engine buffer.
///
/// # Errors
///
/// Returns [`ArgumentError::NonByteCharacter`] when text contains a character
/// whose code exceeds `0xFF`.
pub fn encode(source: &ByteSource) -> Result<EngineBuffer, ArgumentError> {
    match source {
        ByteSource::Bytes(bytes) => Ok(encode_bytes(bytes)),
        ByteSource::Text(text) => {
            let mut buffer = EngineBuffer::new();
            for (position, ch) in text.chars().enumerate() {
                let byte = u8::try_from(u32::from(ch))
                    .map_err(|_| ArgumentError::NonByteCharacter { ch, position })?;
                buffer.push(byte);
            }
            Ok(buffer)
        }
    }
}

/// Encodes a named command parameter, enforcing the TPM2B size limit.
///
/// # Errors
///
/// Returns [`ArgumentError::Oversize`] for payloads longer than
/// [`MAX_TPM2B_LEN`] and propagates [`encode`] failures.
pub fn encode_param(field: &'static str, source: &ByteSource) -> Result<EngineBuffer, ArgumentError> {
    let buffer = encode(source)?;
    check_len(field, buffer.len())?;
    Ok(buffer)
}

/// Encodes named raw bytes, enforcing the TPM2B size limit.
///
/// # Errors
///
/// Returns [`ArgumentError::Oversize`] for payloads longer than
/// [`MAX_TPM2B_LEN`].
pub fn encode_bytes_param(field: &'static str, bytes: &[u8]) -> Result<EngineBuffer, ArgumentError> {
    check_len(field, bytes.len())?;
    Ok(encode_bytes(bytes))
}

const fn check_len(field: &'static str, len: usize) -> Result<(), ArgumentError> {
    if len > MAX_TPM2B_LEN {
        return Err(ArgumentError::Oversize {
            field,
            len,
            max: MAX_TPM2B_LEN,
        });
    }
    Ok(())
}

/// Reads the declared length of `buffer` into a plain byte vector.
#[must_use]
pub fn decode(buffer: &EngineBuffer) -> Vec<u8> {
    (0..buffer.len()).filter_map(|index| buffer.get(index)).collect()
}

#[cfg(test)]
mod tests {
    use super::{decode, encode, encode_bytes, encode_param, ByteSource, MAX_TPM2B_LEN};
    use crate::error::ArgumentError;

    #[test]
    fn empty_input_yields_empty_buffer() {
        let buffer = encode(&ByteSource::default()).expect("empty text encodes");
        assert!(buffer.is_empty());
        assert!(decode(&encode_bytes(&[])).is_empty());
    }

    #[test]
    fn text_is_encoded_by_character_code() {
        let buffer = encode(&ByteSource::from("a\u{ff}")).expect("latin-1 text encodes");
        assert_eq!(decode(&buffer), vec![0x61, 0xFF]);
    }

    #[test]
    fn wide_character_is_rejected() {
        let err = encode(&ByteSource::from("ok\u{263A}")).expect_err("must reject");
        assert_eq!(
            err,
            ArgumentError::NonByteCharacter {
                ch: '\u{263A}',
                position: 2
            }
        );
    }

    #[test]
    fn caller_bytes_are_copied_not_consumed() {
        let source = ByteSource::from(vec![1_u8, 2, 3]);
        let buffer = encode(&source).expect("bytes encode");
        assert_eq!(source, ByteSource::Bytes(vec![1, 2, 3]));
        assert_eq!(buffer.as_slice(), &[1, 2, 3]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn byte_buffers_deserialize_as_bytes() {
        use serde::de::value::{BytesDeserializer, Error, StrDeserializer, UnitDeserializer};
        use serde::Deserialize;

        let bytes = ByteSource::deserialize(BytesDeserializer::<Error>::new(&[0, 0xFF]));
        assert_eq!(bytes, Ok(ByteSource::Bytes(vec![0, 0xFF])));
        let text = ByteSource::deserialize(StrDeserializer::<Error>::new("pw"));
        assert_eq!(text, Ok(ByteSource::from("pw")));
        let null = ByteSource::deserialize(UnitDeserializer::<Error>::new());
        assert_eq!(null, Ok(ByteSource::default()));
    }

    #[test]
    fn oversize_parameter_is_rejected() {
        let source = ByteSource::Bytes(vec![0; MAX_TPM2B_LEN + 1]);
        assert!(matches!(
            encode_param("message", &source),
            Err(ArgumentError::Oversize {
                field: "message",
                ..
            })
        ));
    }
}
