//! Error types for the token codec.
//!
//! Plain enums with manual `Display`/`Error` impls, no `thiserror`/`anyhow`.

use std::error::Error;
use std::fmt;

/// Failure building a token: invariant violations caught before any bytes are
/// produced. Middleware treats these as programmer errors (500), never as a
/// consequence of untrusted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    /// More than 63 values were supplied; the metadata byte has 6 bits for
    /// the count.
    TooManyValues { count: usize },
    /// A single value exceeded 255 bytes; the length prefix is one byte.
    ValueTooLong { index: usize, len: usize },
    /// The requested expiry falls outside the ~10.6-year window the 24-bit
    /// truncated counter can represent.
    ExpiryOutOfRange,
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::TooManyValues { count } => {
                write!(f, "too many values: {count} (max 63)")
            }
            EncodeError::ValueTooLong { index, len } => {
                write!(f, "value {index} is {len} bytes (max 255)")
            }
            EncodeError::ExpiryOutOfRange => write!(f, "expiry is outside the encodable window"),
        }
    }
}

impl Error for EncodeError {}

/// Failure decoding or validating a token. Covers both the codec-level decode
/// step (malformed input, integrity, magic) and the validate step that needs
/// wall-clock time and the caller's remote address (expiry, IP binding).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The printable string, the decompressed frame, or a length-prefixed
    /// field inside it does not parse. The `&'static str` names the specific
    /// check that failed, for logging only — never shown to untrusted callers.
    Malformed(&'static str),
    /// AEAD tag verification failed: either genuine tampering or the wrong key.
    IntegrityFailure,
    /// The decrypted frame's magic byte does not match the deployment's.
    MagicMismatch,
    /// The token's expiry timestamp is in the past.
    Expired,
    /// The decoded expiry counter decodes to a value outside the supported
    /// window (should not happen for tokens this codec produced itself).
    ExpiryOutOfRange,
    /// The token carries a bound IP address that does not match the
    /// request's remote address.
    IpMismatch,
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenError::Malformed(reason) => write!(f, "malformed token: {reason}"),
            TokenError::IntegrityFailure => write!(f, "token integrity check failed"),
            TokenError::MagicMismatch => write!(f, "token magic byte mismatch"),
            TokenError::Expired => write!(f, "token has expired"),
            TokenError::ExpiryOutOfRange => write!(f, "token expiry is out of range"),
            TokenError::IpMismatch => write!(f, "token is bound to a different address"),
        }
    }
}

impl Error for TokenError {}
