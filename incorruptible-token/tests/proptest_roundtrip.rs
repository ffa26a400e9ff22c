//! Property-based round-trip law over arbitrary values vectors and expiries,
//! exercising the `proptest` dev-dependency the Cargo manifest already
//! declares.

use proptest::collection::vec;
use proptest::prelude::*;

use incorruptible_token::{open, seal, Cipher, DecodedToken};

const EXPIRY_BASE_UNIX: i64 = 1_640_995_200;
const EXPIRY_PRECISION_SECS: i64 = 20;
const EXPIRY_MAX_COUNTER: i64 = 0x00FF_FFFF;

fn arb_value() -> impl Strategy<Value = Vec<u8>> {
    vec(any::<u8>(), 0..=255)
}

fn arb_values() -> impl Strategy<Value = Vec<Vec<u8>>> {
    vec(arb_value(), 0..=63)
}

fn arb_expiry() -> impl Strategy<Value = i64> {
    prop_oneof![
        Just(0i64),
        (0i64..=EXPIRY_MAX_COUNTER).prop_map(|counter| EXPIRY_BASE_UNIX + counter * EXPIRY_PRECISION_SECS),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn encode_decode_roundtrips_for_any_valid_token(
        values in arb_values(),
        expiry in arb_expiry(),
        ip_choice in 0u8..3,
    ) {
        let cipher = Cipher::from_parts([0x42u8; 16], [0x24u8; 12]);
        let mut token = DecodedToken::new();
        token.expiry = expiry;
        token.values = values;
        token.ip = match ip_choice {
            0 => Vec::new(),
            1 => vec![1, 2, 3, 4],
            _ => (0u8..16).collect(),
        };

        let encoded = seal(&cipher, 0x51, &token).unwrap();
        let decoded = open(&cipher, 0x51, &encoded).unwrap();

        prop_assert_eq!(&decoded.values, &token.values);
        prop_assert_eq!(&decoded.ip, &token.ip);
        prop_assert!((decoded.expiry - token.expiry).abs() <= EXPIRY_PRECISION_SECS);
    }
}
