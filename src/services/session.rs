// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session key generation and password hashing.
//!
//! Passwords are stored as `pbkdf2-sha256$<iterations>$<salt>$<hash>` with
//! the salt and hash base64 encoded (standard alphabet, no padding).

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};
use std::num::NonZeroU32;

/// Length of an issued session key.
pub const SESSION_KEY_LEN: usize = 32;

const SESSION_KEY_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

// Largest multiple of the alphabet size that fits in a byte; bytes at or
// above it are rejected to keep the draw uniform.
const REJECTION_LIMIT: u8 = (256 / SESSION_KEY_ALPHABET.len() * SESSION_KEY_ALPHABET.len()) as u8;

const PASSWORD_SCHEME: &str = "pbkdf2-sha256";
const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;

static PBKDF2_ALG: pbkdf2::Algorithm = pbkdf2::PBKDF2_HMAC_SHA256;

/// Errors from the system random source.
#[derive(Debug, thiserror::Error)]
#[error("System random number generator failed")]
pub struct RandomError;

/// Generate a random alphanumeric session key.
pub fn generate_session_key() -> Result<String, RandomError> {
    let rng = SystemRandom::new();
    let mut key = String::with_capacity(SESSION_KEY_LEN);
    let mut buf = [0u8; SESSION_KEY_LEN];

    while key.len() < SESSION_KEY_LEN {
        rng.fill(&mut buf).map_err(|_| RandomError)?;
        for &byte in buf.iter().filter(|&&b| b < REJECTION_LIMIT) {
            if key.len() == SESSION_KEY_LEN {
                break;
            }
            let idx = byte as usize % SESSION_KEY_ALPHABET.len();
            key.push(SESSION_KEY_ALPHABET[idx] as char);
        }
    }

    Ok(key)
}

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str, iterations: u32) -> Result<String, RandomError> {
    let iterations = NonZeroU32::new(iterations).unwrap_or(NonZeroU32::MIN);

    let mut salt = [0u8; SALT_LEN];
    SystemRandom::new()
        .fill(&mut salt)
        .map_err(|_| RandomError)?;

    let mut hash = [0u8; HASH_LEN];
    pbkdf2::derive(PBKDF2_ALG, iterations, &salt, password.as_bytes(), &mut hash);

    Ok(format!(
        "{}${}${}${}",
        PASSWORD_SCHEME,
        iterations,
        STANDARD_NO_PAD.encode(salt),
        STANDARD_NO_PAD.encode(hash)
    ))
}

/// Check a password against an encoded hash. Malformed encodings never match.
pub fn verify_password(password: &str, encoded: &str) -> bool {
    let mut parts = encoded.split('$');
    let (Some(scheme), Some(iterations), Some(salt), Some(hash), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return false;
    };

    if scheme != PASSWORD_SCHEME {
        return false;
    }
    let Some(iterations) = iterations.parse::<u32>().ok().and_then(NonZeroU32::new) else {
        return false;
    };
    let (Ok(salt), Ok(hash)) = (STANDARD_NO_PAD.decode(salt), STANDARD_NO_PAD.decode(hash)) else {
        return false;
    };

    pbkdf2::verify(PBKDF2_ALG, iterations, &salt, password.as_bytes(), &hash).is_ok()
}
