//! Scenario tests for ordinary keys, pinned to spec.md §8's fixed vectors.

use secp256k1_core::Key;

const SECRET_OF_ONES: [u8; 32] = [0x01; 32];

#[test]
fn scenario_1_secret_of_ones_pins_known_pubkey() {
    let mut key = Key::new();
    assert!(key.set_secret(&SECRET_OF_ONES, true));
    let pubkey = key.get_public_key().unwrap();
    assert_eq!(pubkey.len(), 33);
    assert_eq!(pubkey[0], 0x03);
}

#[test]
fn scenario_2_sign_verify_zero_hash() {
    let mut key = Key::new();
    assert!(key.set_secret(&SECRET_OF_ONES, true));
    let hash = [0u8; 32];
    let sig = key.sign(&hash).unwrap();
    assert!(key.verify(&hash, &sig));

    let mut flipped = sig.clone();
    flipped[10] ^= 0x01;
    assert!(!key.verify(&hash, &flipped));
}

#[test]
fn scenario_3_compact_header_ranges() {
    let mut compressed = Key::new();
    compressed.make_new(true);
    let hash = [3u8; 32];
    let sig = compressed.sign_compact(&hash).unwrap();
    assert!((31..=34).contains(&sig[0]));

    let mut uncompressed = Key::new();
    uncompressed.make_new(false);
    let sig = uncompressed.sign_compact(&hash).unwrap();
    assert!((27..=30).contains(&sig[0]));
}

#[test]
fn invariant_compact_round_trip_preserves_pubkey_and_compression() {
    for compressed in [true, false] {
        let mut key = Key::new();
        key.make_new(compressed);
        let hash = [5u8; 32];
        let sig = key.sign_compact(&hash).unwrap();

        let mut recovered = Key::new();
        assert!(recovered.set_compact_signature(&hash, &sig));
        assert_eq!(recovered.get_public_key().unwrap(), key.get_public_key().unwrap());
        assert_eq!(recovered.is_compressed(), key.is_compressed());
    }
}

#[test]
fn invariant_secret_pubkey_consistency() {
    let mut key = Key::new();
    assert!(key.set_secret(&SECRET_OF_ONES, true));
    assert!(key.is_valid());
}

#[test]
fn invariant_der_idempotence() {
    let mut key = Key::new();
    key.make_new(true);
    let der = key.get_private_key().unwrap();

    let mut roundtripped = Key::new();
    assert!(roundtripped.set_private_key(&der));
    assert_eq!(roundtripped.get_secret().unwrap(), key.get_secret().unwrap());
    assert_eq!(roundtripped.get_public_key().unwrap(), key.get_public_key().unwrap());
    assert_eq!(roundtripped.is_compressed(), key.is_compressed());
}

#[test]
fn invariant_public_key_length_rejection() {
    let mut key = Key::new();
    assert!(!key.set_public_key(&[0u8; 32]));
    assert!(!key.set_public_key(&[0u8; 64]));
}
