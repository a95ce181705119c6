//! Password hashing (PBKDF2-HMAC-SHA256).
//!
//! Encoded form: `pbkdf2_sha256$<iterations>$<salt b64>$<hash b64>`, so the
//! iteration count can be raised without invalidating stored hashes.

use base64::{Engine, engine::general_purpose::STANDARD_NO_PAD};
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

pub const ALGORITHM: &str = "pbkdf2_sha256";
const SALT_LENGTH: usize = 16;
const HASH_LENGTH: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Malformed password hash")]
    Malformed,
    #[error("Unsupported password hash algorithm: {0}")]
    UnsupportedAlgorithm(String),
}

/// Hash `password` with a fresh random salt.
pub fn hash_password(password: &str, iterations: u32) -> String {
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt);

    let hash = derive(password, &salt, iterations);
    format!(
        "{}${}${}${}",
        ALGORITHM,
        iterations,
        STANDARD_NO_PAD.encode(salt),
        STANDARD_NO_PAD.encode(hash)
    )
}

/// Check `password` against an encoded hash produced by [`hash_password`].
pub fn verify_password(password: &str, encoded: &str) -> Result<bool, PasswordError> {
    let mut parts = encoded.split('$');
    let (Some(algorithm), Some(iterations), Some(salt), Some(expected), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return Err(PasswordError::Malformed);
    };

    if algorithm != ALGORITHM {
        return Err(PasswordError::UnsupportedAlgorithm(algorithm.to_string()));
    }

    let iterations: u32 = iterations.parse().map_err(|_| PasswordError::Malformed)?;
    if iterations == 0 {
        return Err(PasswordError::Malformed);
    }
    let salt = STANDARD_NO_PAD
        .decode(salt)
        .map_err(|_| PasswordError::Malformed)?;
    let expected = STANDARD_NO_PAD
        .decode(expected)
        .map_err(|_| PasswordError::Malformed)?;
    if expected.len() != HASH_LENGTH {
        return Err(PasswordError::Malformed);
    }

    let actual = derive(password, &salt, iterations);
    Ok(actual.as_slice().ct_eq(expected.as_slice()).into())
}

fn derive(password: &str, salt: &[u8], iterations: u32) -> [u8; HASH_LENGTH] {
    let mut out = [0u8; HASH_LENGTH];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROUNDS: u32 = 1_000;

    #[test]
    fn correct_password_verifies() {
        let encoded = hash_password("12345678", ROUNDS);
        assert_eq!(verify_password("12345678", &encoded), Ok(true));
    }

    #[test]
    fn wrong_password_fails() {
        let encoded = hash_password("12345678", ROUNDS);
        assert_eq!(verify_password("87654321", &encoded), Ok(false));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        assert_ne!(hash_password("pw-pw-pw", ROUNDS), hash_password("pw-pw-pw", ROUNDS));
    }

    #[test]
    fn encoding_carries_iterations() {
        let encoded = hash_password("pw-pw-pw", ROUNDS);
        assert!(encoded.starts_with("pbkdf2_sha256$1000$"));
    }

    #[test]
    fn malformed_hashes_are_rejected() {
        assert_eq!(verify_password("x", "garbage"), Err(PasswordError::Malformed));
        assert_eq!(
            verify_password("x", "pbkdf2_sha256$abc$c2FsdA$aGFzaA"),
            Err(PasswordError::Malformed)
        );
        assert_eq!(
            verify_password("x", "bcrypt$10$c2FsdA$aGFzaA"),
            Err(PasswordError::UnsupportedAlgorithm("bcrypt".into()))
        );
    }
}
