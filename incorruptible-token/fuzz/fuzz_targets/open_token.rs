#![no_main]

use libfuzzer_sys::fuzz_target;
use once_cell::sync::Lazy;

use incorruptible_token::Cipher;

const MAGIC: u8 = 0x51;

static CIPHER: Lazy<Cipher> = Lazy::new(|| Cipher::from_parts([0x42u8; 16], [0x24u8; 12]));

// Drives the whole untrusted-input path a cookie value takes: printable
// decode, AEAD open, frame decode. `open` must never panic no matter what a
// client sends, only return an `Err`.
fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let _ = incorruptible_token::open(&CIPHER, MAGIC, s);
});
