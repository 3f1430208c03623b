use base64::{Engine, engine::general_purpose::STANDARD};
use datacast_crypto::{
    CryptoError, NONCE_SIZE, SEAL_VERSION, SealedValue, TAG_SIZE, ColumnKey, open,
    open_string, seal, seal_string,
};

#[test]
fn seal_open_roundtrip() {
    let key = ColumnKey::random();
    let sealed = seal(&key, b"{\"string\":\"Test\"}").unwrap();
    let opened = open(&key, &sealed).unwrap();
    assert_eq!(opened, b"{\"string\":\"Test\"}");
}

#[test]
fn seal_open_empty() {
    let key = ColumnKey::random();
    let sealed = seal(&key, b"").unwrap();
    assert_eq!(sealed.ciphertext.len(), TAG_SIZE);
    assert_eq!(open(&key, &sealed).unwrap(), b"");
}

#[test]
fn wrong_key_fails_open() {
    let sealed = seal(&ColumnKey::random(), b"secret").unwrap();
    let err = open(&ColumnKey::random(), &sealed).unwrap_err();
    assert!(err.is_decryption());
}

#[test]
fn tampered_ciphertext_fails_open() {
    let key = ColumnKey::random();
    let mut sealed = seal(&key, b"secret").unwrap();
    sealed.ciphertext[0] ^= 0xFF;
    assert!(open(&key, &sealed).is_err());
}

#[test]
fn same_plaintext_produces_different_nonces() {
    let key = ColumnKey::random();
    let a = seal(&key, b"same").unwrap();
    let b = seal(&key, b"same").unwrap();
    assert_ne!(a.nonce, b.nonce);
    assert_ne!(a.ciphertext, b.ciphertext);
}

// ── SealedValue encoding ─────────────────────────────────────────

#[test]
fn sealed_value_len_counts_header() {
    let sealed = seal(&ColumnKey::random(), b"test").unwrap();
    assert_eq!(sealed.len(), 1 + NONCE_SIZE + sealed.ciphertext.len());
    assert!(!sealed.is_empty());
}

#[test]
fn base64_roundtrip() {
    let sealed = seal(&ColumnKey::random(), b"data").unwrap();
    let decoded = SealedValue::from_base64(&sealed.to_base64()).unwrap();
    assert_eq!(decoded, sealed);
}

#[test]
fn base64_starts_with_version_byte() {
    let sealed = seal(&ColumnKey::random(), b"data").unwrap();
    let bytes = STANDARD.decode(sealed.to_base64()).unwrap();
    assert_eq!(bytes[0], SEAL_VERSION);
}

#[test]
fn base64_too_short_fails() {
    let short = STANDARD.encode([SEAL_VERSION; 10]);
    let err = SealedValue::from_base64(&short).unwrap_err();
    assert!(matches!(err, CryptoError::Decryption(ref m) if m.contains("too short")));
}

#[test]
fn base64_invalid_fails() {
    let err = SealedValue::from_base64("!!!not-base64!!!").unwrap_err();
    assert!(err.is_decryption());
}

#[test]
fn unknown_version_is_rejected() {
    let mut bytes = vec![9u8];
    bytes.extend_from_slice(&[0u8; NONCE_SIZE + TAG_SIZE]);
    let err = SealedValue::from_base64(&STANDARD.encode(bytes)).unwrap_err();
    assert!(matches!(err, CryptoError::UnsupportedVersion(9)));
    assert!(err.is_decryption());
}

#[test]
fn plain_json_is_not_a_sealed_value() {
    assert!(SealedValue::from_base64(r#"{"string":"Test"}"#).is_err());
}

// ── Strings ──────────────────────────────────────────────────────

#[test]
fn string_seal_open() {
    let key = ColumnKey::random();
    let plaintext = "Hello, 世界! 🌍";
    let sealed = seal_string(&key, plaintext).unwrap();
    assert_ne!(sealed, plaintext);
    assert_eq!(open_string(&key, &sealed).unwrap(), plaintext);
}

#[test]
fn open_string_wrong_key_fails() {
    let sealed = seal_string(&ColumnKey::random(), "secret").unwrap();
    assert!(open_string(&ColumnKey::random(), &sealed).is_err());
}
