#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

//! Property-based tests for the base32 codec.

use proptest::prelude::*;
use sesame_otp_core::base32;

proptest! {
    /// decode(encode(b)) == b for every non-empty byte sequence.
    #[test]
    fn roundtrip(bytes in proptest::collection::vec(any::<u8>(), 1..=64)) {
        let text = base32::encode(&bytes);
        prop_assert_eq!(base32::decode(&text).expect("roundtrip"), bytes);
    }

    /// Decoding succeeds with padding stripped.
    #[test]
    fn padding_is_optional(bytes in proptest::collection::vec(any::<u8>(), 1..=64)) {
        let text = base32::encode(&bytes);
        let unpadded = text.trim_end_matches('=');
        prop_assert_eq!(base32::decode(unpadded).expect("unpadded decode"), bytes);
    }

    /// Lowercased encodings decode to the same bytes.
    #[test]
    fn lowercase_is_accepted(bytes in proptest::collection::vec(any::<u8>(), 1..=64)) {
        let text = base32::encode(&bytes).to_ascii_lowercase();
        prop_assert_eq!(base32::decode(&text).expect("lowercase decode"), bytes);
    }

    /// Encoded output only ever uses the RFC 4648 alphabet plus padding.
    #[test]
    fn alphabet_is_respected(bytes in proptest::collection::vec(any::<u8>(), 1..=64)) {
        let text = base32::encode(&bytes);
        prop_assert!(text
            .bytes()
            .all(|b| b.is_ascii_uppercase() || (b'2'..=b'7').contains(&b) || b == b'='));
    }
}
