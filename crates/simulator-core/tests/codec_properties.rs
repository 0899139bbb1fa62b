//! Property coverage for the engine buffer and big-integer codecs.

use num_bigint::BigUint;
use num_traits::Zero;
use proptest::prelude::*;
use rstest::rstest;
use simulator_core::{
    bytes_to_int, decode, encode, encode_bytes, from_hex, int_to_bytes, strip_leading_zeros,
    to_hex, ArgumentError, ByteSource,
};

use log as _;
#[cfg(feature = "serde")]
use serde as _;
use sha2 as _;
use thiserror as _;

proptest! {
    #[test]
    fn byte_buffers_preserve_order_and_length(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
        let buffer = encode_bytes(&bytes);
        prop_assert_eq!(buffer.len(), bytes.len());
        prop_assert_eq!(decode(&buffer), bytes);
    }

    #[test]
    fn latin1_text_encodes_to_its_code_points(codes in proptest::collection::vec(any::<u8>(), 0..128)) {
        let text: String = codes.iter().map(|&code| char::from(code)).collect();
        let buffer = encode(&ByteSource::from(text)).expect("latin-1 fits in bytes");
        prop_assert_eq!(decode(&buffer), codes);
    }

    #[test]
    fn integers_round_trip_through_minimal_bytes(bytes in proptest::collection::vec(any::<u8>(), 0..96)) {
        let value = bytes_to_int(&bytes);
        let minimal = int_to_bytes(&value);
        prop_assert_eq!(minimal.as_slice(), strip_leading_zeros(&bytes));
        prop_assert_eq!(bytes_to_int(&minimal), value);
    }

    #[test]
    fn hex_round_trips_every_integer(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
        let value = BigUint::from_bytes_be(&bytes);
        let text = to_hex(&value);
        prop_assert!(text.starts_with("0x"));
        prop_assert_eq!(from_hex(&text).expect("own output parses"), value);
    }

    #[test]
    fn hex_accepts_either_digit_case(value in any::<u64>()) {
        let upper = format!("0x{value:X}");
        prop_assert_eq!(from_hex(&upper).expect("upper"), BigUint::from(value));
    }
}

#[test]
fn zero_is_empty_bytes_and_0x0() {
    assert!(int_to_bytes(&BigUint::zero()).is_empty());
    assert!(bytes_to_int(&[]).is_zero());
    assert!(bytes_to_int(&[0, 0, 0]).is_zero());
    assert_eq!(to_hex(&BigUint::zero()), "0x0");
}

#[test]
fn big_endian_interpretation() {
    assert_eq!(bytes_to_int(&[0x01, 0x00]), BigUint::from(256_u32));
    assert_eq!(int_to_bytes(&BigUint::from(0x0102_u32)), [0x01, 0x02]);
    assert_eq!(to_hex(&BigUint::from(0xC0FFEE_u32)), "0xc0ffee");
}

#[rstest]
#[case::no_prefix("1234")]
#[case::prefix_only("0x")]
#[case::non_hex_digit("0x12g4")]
#[case::sign("-0x12")]
#[case::empty("")]
fn malformed_hex_is_rejected(#[case] text: &str) {
    assert_eq!(
        from_hex(text),
        Err(ArgumentError::MalformedHex(text.to_owned()))
    );
}
