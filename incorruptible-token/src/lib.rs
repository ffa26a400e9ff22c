//! Compact, authenticated, self-contained session token codec.
//!
//! Five pieces compose front-to-back: a typed [`DecodedToken`], the
//! bit-frame codec ([`frame`]), adaptive compression ([`compress`]), an AEAD
//! [`Cipher`], and a cookie-safe [`printable`] encoding. [`seal`] and [`open`]
//! drive all four in order; [`validate`] applies the checks that need
//! information the codec itself doesn't have (wall-clock time, the caller's
//! remote address).
//!
//! This crate has no HTTP dependency — wiring it into request handling lives
//! in `incorruptible-session`.

#![deny(unsafe_code)]

pub mod cipher;
pub mod compress;
pub mod error;
pub mod frame;
pub mod printable;
pub mod token;

pub use cipher::Cipher;
pub use error::{EncodeError, TokenError};
pub use token::{shorten_ip, DecodedToken, MAX_VALUES, MAX_VALUE_LEN};

use std::net::IpAddr;

/// Encodes and seals `token` into a printable string: bit-frame, adaptive
/// compression, AEAD encryption, printable encoding, in that order.
pub fn seal(cipher: &Cipher, magic: u8, token: &DecodedToken) -> Result<String, EncodeError> {
    let plaintext = frame::encode(token, magic)?;
    let ciphertext = cipher.seal(&plaintext);
    Ok(printable::encode(&ciphertext))
}

/// Reverses [`seal`]: printable-decodes, decrypts, and frame-decodes
/// `encoded`, checking the result's magic byte against `magic`.
///
/// Does not check expiry or IP binding — call [`validate`] on the result for
/// those, since they depend on context this function doesn't have.
pub fn open(cipher: &Cipher, magic: u8, encoded: &str) -> Result<DecodedToken, TokenError> {
    let ciphertext = printable::decode(encoded)?;
    let plaintext = cipher.open(&ciphertext)?;
    let decoded = frame::decode(&plaintext)?;
    if decoded.magic != magic {
        return Err(TokenError::MagicMismatch);
    }
    Ok(decoded.token)
}

/// Checks a decoded token's expiry and, if it carries a bound address,
/// that `remote_ip` matches it. `now` is a Unix timestamp.
pub fn validate(token: &DecodedToken, now: i64, remote_ip: Option<IpAddr>) -> Result<(), TokenError> {
    if !frame::expiry_in_range(token.expiry) {
        return Err(TokenError::ExpiryOutOfRange);
    }
    if token.expiry != 0 && token.expiry < now {
        return Err(TokenError::Expired);
    }
    if !token.ip.is_empty() {
        let remote = remote_ip.map(shorten_ip).unwrap_or_default();
        if remote != token.ip {
            return Err(TokenError::IpMismatch);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_cipher() -> Cipher {
        Cipher::from_parts([5u8; 16], [6u8; 12])
    }

    #[test]
    fn seal_open_roundtrip() {
        let cipher = test_cipher();
        let mut token = DecodedToken::new();
        token.set_uint(0, 99);
        token.set_str(1, "session owner");
        let encoded = seal(&cipher, 0x10, &token).unwrap();
        let decoded = open(&cipher, 0x10, &encoded).unwrap();
        assert_eq!(decoded, token);
    }

    #[test]
    fn wrong_magic_rejected() {
        let cipher = test_cipher();
        let token = DecodedToken::new();
        let encoded = seal(&cipher, 0x10, &token).unwrap();
        assert_eq!(open(&cipher, 0x11, &encoded), Err(TokenError::MagicMismatch));
    }

    #[test]
    fn validate_checks_expiry_and_ip() {
        let mut token = DecodedToken::new();
        token.expiry = 2_000_000_000;
        token.ip = vec![10, 0, 0, 1];

        assert!(validate(&token, 1_000_000_000, Some("10.0.0.1".parse().unwrap())).is_ok());
        assert_eq!(
            validate(&token, 3_000_000_000, Some("10.0.0.1".parse().unwrap())),
            Err(TokenError::Expired)
        );
        assert_eq!(
            validate(&token, 1_000_000_000, Some("10.0.0.2".parse().unwrap())),
            Err(TokenError::IpMismatch)
        );
        assert_eq!(validate(&token, 1_000_000_000, None), Err(TokenError::IpMismatch));
    }

    #[test]
    fn validate_with_no_expiry_and_no_ip_always_passes() {
        let token = DecodedToken::new();
        assert!(validate(&token, 9_999_999_999, None).is_ok());
    }
}
