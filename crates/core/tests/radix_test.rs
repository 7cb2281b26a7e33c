//! Tests for the base-N integer codec: round trips across the supported
//! bases, symbolic notation, and the documented range errors.

use prettyps_core::codec::radix::{self, RadixError};

const SAMPLES: &[i64] = &[0, 1, -1, i64::MAX];

#[test]
fn plain_round_trip_for_all_bases() {
    for base in 2..=36 {
        for &value in SAMPLES {
            let encoded = radix::encode(value, base, false).expect("encode");
            let decoded = radix::decode(&encoded, base, false).expect("decode");
            assert_eq!(decoded, value, "base {base}, value {value} ({encoded})");
        }
    }
}

#[test]
fn symbolic_round_trip_for_representative_bases() {
    for base in [2, 10, 36, 1000, 999_999] {
        for &value in SAMPLES {
            let encoded = radix::encode(value, base, true).expect("encode");
            let decoded = radix::decode(&encoded, base, true).expect("decode");
            assert_eq!(decoded, value, "base {base}, value {value} ({encoded})");
        }
    }
}

#[test]
fn known_encodings() {
    assert_eq!(radix::encode(255, 16, false).unwrap(), "FF");
    assert_eq!(radix::encode(-10, 2, false).unwrap(), "-1010");
    assert_eq!(radix::encode(0, 8, false).unwrap(), "0");
    assert_eq!(radix::encode(0, 16, true).unwrap(), "[(16),0]");
    assert_eq!(radix::encode(-26, 16, true).unwrap(), "[(16),-,1,10]");
}

#[test]
fn radix_below_two_is_rejected() {
    assert_eq!(radix::decode("10", 1, false), Err(RadixError::RadixTooSmall));
    assert_eq!(radix::encode(10, 0, false), Err(RadixError::RadixTooSmall));
}

#[test]
fn radix_above_36_is_rejected_in_plain_mode() {
    assert_eq!(radix::decode("10", 37, false), Err(RadixError::RadixTooLarge));
    assert_eq!(radix::encode(10, 37, false), Err(RadixError::RadixTooLarge));
    // ...but fine symbolically.
    assert!(radix::encode(10, 37, true).is_ok());
}

#[test]
fn radix_above_a_million_is_rejected_even_symbolically() {
    assert_eq!(
        radix::encode(10, 1_000_001, true),
        Err(RadixError::SymbolicRadixTooLarge)
    );
    assert_eq!(
        radix::decode("[(1000001),1]", 1_000_001, true),
        Err(RadixError::SymbolicRadixTooLarge)
    );
}

#[test]
fn digits_outside_the_base_are_format_errors() {
    assert_eq!(radix::decode("19", 8, false), Err(RadixError::NotInRadixFormat));
    assert_eq!(radix::decode("1Z", 16, false), Err(RadixError::NotInRadixFormat));
}

#[test]
fn symbolic_decode_requires_bracket_syntax() {
    assert_eq!(
        radix::decode("42", 16, true),
        Err(RadixError::NotInSymbolicFormat)
    );
}

#[test]
fn signs_are_honored() {
    assert_eq!(radix::decode("-FF", 16, false).unwrap(), -255);
    assert_eq!(radix::decode("+FF", 16, false).unwrap(), 255);
    assert_eq!(radix::decode("[(8),-,7,7]", 8, true).unwrap(), -63);
}
