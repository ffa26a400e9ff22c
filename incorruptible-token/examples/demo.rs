//! Walks through the codec end to end: keygen → seal → open, value views,
//! IP binding, and tamper detection.

use incorruptible_token::{open, seal, validate, Cipher, DecodedToken};

fn section(title: &str) {
    println!("\n--- {title} ---");
}

fn main() {
    section("1. Cipher construction");
    let cipher = Cipher::new([0x11u8; 16]);
    println!("  nonce: {:02x?}", cipher.nonce());

    section("2. Default token");
    let default = DecodedToken::new();
    let encoded = seal(&cipher, 0x51, &default).unwrap();
    println!("  printable form ({} chars): {encoded}", encoded.len());
    let decoded = open(&cipher, 0x51, &encoded).unwrap();
    assert_eq!(decoded, default);
    println!("  roundtrip: ok");

    section("3. Value views");
    let mut token = DecodedToken::new();
    token.set_uint(0, 4096);
    token.set_bool(1, true);
    token.set_str(2, "alice");
    println!("  uint[0] = {}", token.get_uint(0));
    println!("  bool[1] = {}", token.get_bool(1));
    println!("  str[2]  = {}", token.get_str(2));

    section("4. IP binding");
    token.expiry = 1_900_000_000;
    token.bind_ip("198.51.100.7".parse().unwrap());
    let encoded = seal(&cipher, 0x51, &token).unwrap();
    let decoded = open(&cipher, 0x51, &encoded).unwrap();
    let ok = validate(&decoded, 1_000_000_000, Some("198.51.100.7".parse().unwrap()));
    let mismatch = validate(&decoded, 1_000_000_000, Some("198.51.100.8".parse().unwrap()));
    println!("  same address:      {:?}", ok);
    println!("  different address: {:?}", mismatch);

    section("5. Tamper detection");
    let mut chars: Vec<char> = encoded.chars().collect();
    let last = chars.len() - 1;
    chars[last] = if chars[last] == '!' { '~' } else { '!' };
    let tampered: String = chars.into_iter().collect();
    println!("  open(tampered) = {:?}", open(&cipher, 0x51, &tampered));

    section("6. Large value crosses the compression threshold");
    let mut big = DecodedToken::new();
    big.values.push(vec![0x42; 500]);
    let encoded = seal(&cipher, 0x51, &big).unwrap();
    let decoded = open(&cipher, 0x51, &encoded).unwrap();
    assert_eq!(decoded.values[0], big.values[0]);
    println!("  500-byte value roundtripped through {} printable chars", encoded.len());

    println!("\nAll demos passed.");
}
