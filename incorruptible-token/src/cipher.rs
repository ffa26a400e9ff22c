//! The AEAD layer wrapping the bit-frame before it is printable-encoded.
//!
//! A [`Cipher`] holds a 128-bit key and a 96-bit nonce drawn once, at
//! construction, from a cryptographic RNG. Every [`Cipher::seal`] call on the
//! same instance reuses that nonce. This is a known weakness, carried over
//! deliberately rather than silently fixed: reusing a nonce under the same
//! key for GCM degrades the authentication guarantee once enough ciphertexts
//! accumulate under one key. A deployment that wants a stronger bound should
//! rotate the key (and therefore the `Cipher`) well before that point, or
//! move to a scheme that prepends a fresh nonce to each ciphertext and bumps
//! the frame's magic byte to mark the wire-format change — that redesign is
//! out of scope here; this type keeps the original, documented contract.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes128Gcm, Key, Nonce};

use crate::error::TokenError;

const KEY_LEN: usize = 16;
const NONCE_LEN: usize = 12;

/// A symmetric cipher bound to one key and one nonce for its whole lifetime.
pub struct Cipher {
    key: [u8; KEY_LEN],
    nonce: [u8; NONCE_LEN],
}

impl Cipher {
    /// Builds a cipher from a 128-bit key, drawing a fresh nonce from the
    /// system RNG.
    pub fn new(key: [u8; KEY_LEN]) -> Self {
        let mut nonce = [0u8; NONCE_LEN];
        getrandom::getrandom(&mut nonce).expect("system RNG must be available");
        Self { key, nonce }
    }

    /// Builds a cipher from an explicit key and nonce, for deployments that
    /// persist the nonce across restarts (or for tests that need determinism).
    pub fn from_parts(key: [u8; KEY_LEN], nonce: [u8; NONCE_LEN]) -> Self {
        Self { key, nonce }
    }

    /// The nonce this instance reuses for every seal. Exposed so a
    /// deployment can persist it alongside the key.
    pub fn nonce(&self) -> [u8; NONCE_LEN] {
        self.nonce
    }

    fn aead(&self) -> Aes128Gcm {
        Aes128Gcm::new(Key::<Aes128Gcm>::from_slice(&self.key))
    }

    /// Encrypts `plaintext`, returning ciphertext with the authentication
    /// tag appended.
    pub fn seal(&self, plaintext: &[u8]) -> Vec<u8> {
        self.aead()
            .encrypt(Nonce::from_slice(&self.nonce), plaintext)
            .expect("aes-gcm encryption of a bounded in-memory buffer cannot fail")
    }

    /// Decrypts and verifies `ciphertext`. Any tampering, truncation, or key
    /// mismatch surfaces uniformly as [`TokenError::IntegrityFailure`] —
    /// never distinguished further, so a caller cannot use the failure mode
    /// as an oracle.
    pub fn open(&self, ciphertext: &[u8]) -> Result<Vec<u8>, TokenError> {
        self.aead()
            .decrypt(Nonce::from_slice(&self.nonce), ciphertext)
            .map_err(|_| TokenError::IntegrityFailure)
    }
}
