use datacast_crypto::{CryptoError, EncryptorError};

fn all_variants() -> Vec<CryptoError> {
    vec![
        CryptoError::KeyDerivation("memory cost too low".into()),
        CryptoError::Encryption("aead failure".into()),
        CryptoError::Decryption("authentication failed".into()),
        CryptoError::UnsupportedVersion(7),
        CryptoError::InvalidKeyLength {
            expected: 32,
            actual: 16,
        },
        CryptoError::InvalidKeyEncoding("bad padding".into()),
    ]
}

// ── Display ──────────────────────────────────────────────────────

#[test]
fn messages_carry_their_detail() {
    let messages: Vec<String> = all_variants().iter().map(ToString::to_string).collect();
    assert_eq!(
        messages,
        [
            "key derivation failed: memory cost too low",
            "encryption failed: aead failure",
            "decryption failed: authentication failed",
            "decryption failed: unsupported seal version 7",
            "invalid key length: expected 32, got 16",
            "invalid key encoding: bad padding",
        ]
    );
}

// ── Classification ───────────────────────────────────────────────

#[test]
fn only_unopenable_ciphertext_counts_as_decryption() {
    let decryption: Vec<bool> = all_variants().iter().map(CryptoError::is_decryption).collect();
    assert_eq!(decryption, [false, false, true, true, false, false]);
}

#[test]
fn encryptor_error_keeps_the_classification() {
    for err in all_variants() {
        let was_decryption = err.is_decryption();
        let converted = EncryptorError::from(err);
        assert_eq!(
            matches!(converted, EncryptorError::Decryption(_)),
            was_decryption,
            "{converted}"
        );
    }
}
