//! End-to-end round-trip properties across the whole seal/open pipeline
//! (bit-frame, adaptive compression, AEAD, printable encoding).

use incorruptible_token::{seal, open, validate, Cipher, DecodedToken, TokenError};

fn test_cipher() -> Cipher {
    Cipher::from_parts([0x11u8; 16], [0x22u8; 12])
}

#[test]
fn default_token_roundtrips_exactly() {
    let cipher = test_cipher();
    let default = DecodedToken::new();
    let encoded = seal(&cipher, 0x51, &default).unwrap();
    let decoded = open(&cipher, 0x51, &encoded).unwrap();
    assert_eq!(decoded, default);
}

#[test]
fn default_token_printable_form_is_at_least_twenty_chars() {
    let cipher = test_cipher();
    let encoded = seal(&cipher, 0x51, &DecodedToken::new()).unwrap();
    assert!(encoded.len() >= 20, "default token encoded to {} chars", encoded.len());
}

#[test]
fn decoding_anything_shorter_than_twenty_chars_is_malformed() {
    let err = open(&test_cipher(), 0x51, "short").unwrap_err();
    assert!(matches!(err, TokenError::Malformed(_)));
}

#[test]
fn value_slot_growth_zero_pads_earlier_slots() {
    let cipher = test_cipher();
    let mut token = DecodedToken::new();
    token.set_str(4, "hi");
    assert_eq!(token.value_count(), 5);

    let encoded = seal(&cipher, 0x51, &token).unwrap();
    let decoded = open(&cipher, 0x51, &encoded).unwrap();
    assert_eq!(decoded.value_count(), 5);
    for i in 0..4 {
        assert_eq!(decoded.values[i], Vec::<u8>::new());
    }
    assert_eq!(decoded.get_str(4), "hi");
}

#[test]
fn ip_v4_binding_matches_and_mismatches() {
    let cipher = test_cipher();
    let mut token = DecodedToken::new();
    token.expiry = 1_900_000_000;
    token.bind_ip("11.22.33.44".parse().unwrap());

    let encoded = seal(&cipher, 0x51, &token).unwrap();
    let decoded = open(&cipher, 0x51, &encoded).unwrap();

    assert!(validate(&decoded, 1_000_000_000, Some("11.22.33.44".parse().unwrap())).is_ok());
    assert_eq!(
        validate(&decoded, 1_000_000_000, Some("11.22.33.45".parse().unwrap())),
        Err(TokenError::IpMismatch)
    );
}

#[test]
fn v4_mapped_v6_compares_equal_to_v4() {
    let cipher = test_cipher();
    let mut token = DecodedToken::new();
    token.expiry = 1_900_000_000;
    token.bind_ip("203.0.113.9".parse().unwrap());
    let encoded = seal(&cipher, 0x51, &token).unwrap();
    let decoded = open(&cipher, 0x51, &encoded).unwrap();

    let mapped = "::ffff:203.0.113.9".parse().unwrap();
    assert!(validate(&decoded, 1_000_000_000, Some(mapped)).is_ok());
}

#[test]
fn large_value_crosses_into_compression() {
    let cipher = test_cipher();
    let mut token = DecodedToken::new();
    token.values.push(vec![0xAB; 500]);

    let encoded = seal(&cipher, 0x51, &token).unwrap();
    let decoded = open(&cipher, 0x51, &encoded).unwrap();
    assert_eq!(decoded.values[0], vec![0xAB; 500]);
}

#[test]
fn expiry_survives_within_precision_window() {
    let cipher = test_cipher();
    let now = 1_700_000_000i64;
    let mut token = DecodedToken::new();
    token.expiry = now;

    let encoded = seal(&cipher, 0x51, &token).unwrap();
    let decoded = open(&cipher, 0x51, &encoded).unwrap();
    assert!((decoded.expiry - now).abs() <= 20);
}

#[test]
fn flipping_any_ciphertext_bit_never_yields_a_different_valid_token() {
    let cipher = test_cipher();
    let mut token = DecodedToken::new();
    token.expiry = 1_900_000_000;
    token.set_str(0, "account-42");

    let encoded = seal(&cipher, 0x51, &token).unwrap();
    let original = open(&cipher, 0x51, &encoded).unwrap();

    for i in 0..encoded.len() {
        let mut chars: Vec<char> = encoded.chars().collect();
        let original_char = chars[i];
        for replacement in ['!', 'z', '9'] {
            if replacement == original_char {
                continue;
            }
            chars[i] = replacement;
            let tampered: String = chars.iter().collect();
            match open(&cipher, 0x51, &tampered) {
                Err(_) => {}
                Ok(decoded) => assert_eq!(decoded, original, "tampered token decoded to a silently different value"),
            }
            chars[i] = original_char;
        }
    }
}
