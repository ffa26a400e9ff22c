//! Adaptive compression over the bit-frame payload.
//!
//! Compression is wasteful for very small payloads (the Snappy frame header
//! alone can erase the saving) and a near-certain win once values start
//! stacking up. In between, the decision is randomized rather than threshold
//! exact, so an observer watching token lengths cannot infer the exact
//! payload size from whether a given token happens to be compressed.

use snap::raw::{Decoder, Encoder};

const NEVER_BELOW: usize = 100;
const ALWAYS_AT_OR_ABOVE: usize = 180;

/// Decides whether a payload of `len` bytes should be compressed.
pub fn should_compress(len: usize) -> bool {
    if len < NEVER_BELOW {
        return false;
    }
    if len >= ALWAYS_AT_OR_ABOVE {
        return true;
    }
    let mut coin = [0u8; 1];
    getrandom::getrandom(&mut coin).expect("system RNG must be available");
    coin[0] & 1 == 1
}

/// Compresses `data` with Snappy's raw block format.
pub fn compress(data: &[u8]) -> Vec<u8> {
    Encoder::new()
        .compress_vec(data)
        .expect("snappy compression of a bounded in-memory buffer cannot fail")
}

/// Decompresses a Snappy raw block previously produced by [`compress`].
pub fn decompress(data: &[u8]) -> Result<Vec<u8>, snap::Error> {
    Decoder::new().decompress_vec(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_below_threshold() {
        for _ in 0..50 {
            assert!(!should_compress(99));
        }
    }

    #[test]
    fn always_at_or_above_threshold() {
        for _ in 0..50 {
            assert!(should_compress(180));
            assert!(should_compress(4096));
        }
    }

    #[test]
    fn roundtrip() {
        let data = b"the quick brown fox jumps over the lazy dog".repeat(4);
        let compressed = compress(&data);
        let decompressed = decompress(&compressed).unwrap();
        assert_eq!(decompressed, data);
    }

    #[test]
    fn corrupt_input_is_rejected() {
        assert!(decompress(&[0xff, 0xff, 0xff, 0xff, 0xff]).is_err());
    }
}
