//! `{PKCS5S2}` password hashes.
//!
//! The format stores a PBKDF2-HMAC-SHA1 derived key next to its salt:
//!
//! ```text
//! {PKCS5S2}base64(salt[16] || key[32])
//! ```
//!
//! with a fixed iteration count of 10 000. It is the default format of the
//! Atlassian password encoder and is common in directories exported from
//! those products.
//!
//! ## Security
//!
//! SHA-1 is only used here as the PRF of PBKDF2 for compatibility with
//! hashes that already exist in external stores. Verification is
//! constant-time with respect to the derived key.

use std::num::NonZeroU32;

use aws_lc_rs::pbkdf2;
use aws_lc_rs::rand::{SecureRandom, SystemRandom};
use base64::{Engine, engine::general_purpose::STANDARD};
use thiserror::Error;

/// Prefix identifying a `{PKCS5S2}` hash.
pub const PREFIX: &str = "{PKCS5S2}";

/// Salt length in bytes.
pub const SALT_LEN: usize = 16;

/// Derived key length in bytes.
pub const KEY_LEN: usize = 32;

const ITERATIONS: NonZeroU32 = match NonZeroU32::new(10_000) {
    Some(n) => n,
    None => panic!("iteration count must be non-zero"),
};

/// Errors produced while encoding a `{PKCS5S2}` hash.
#[derive(Debug, Error)]
pub enum Pkcs5S2Error {
    /// The system random number generator failed.
    #[error("failed to generate salt")]
    Random,
}

/// Hashes a password with a freshly generated salt.
///
/// # Errors
///
/// Returns an error if the system random number generator fails.
pub fn encode(password: &str) -> Result<String, Pkcs5S2Error> {
    let mut salt = [0u8; SALT_LEN];
    SystemRandom::new()
        .fill(&mut salt)
        .map_err(|_| Pkcs5S2Error::Random)?;
    Ok(encode_with_salt(password, &salt))
}

/// Hashes a password with the given salt.
#[must_use]
pub fn encode_with_salt(password: &str, salt: &[u8; SALT_LEN]) -> String {
    let mut raw = [0u8; SALT_LEN + KEY_LEN];
    raw[..SALT_LEN].copy_from_slice(salt);
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA1,
        ITERATIONS,
        salt,
        password.as_bytes(),
        &mut raw[SALT_LEN..],
    );
    format!("{PREFIX}{}", STANDARD.encode(raw))
}

/// Checks whether `stored` is a `{PKCS5S2}` hash.
#[must_use]
pub fn can_decode(stored: &str) -> bool {
    stored.starts_with(PREFIX)
}

/// Verifies a password against a stored `{PKCS5S2}` hash.
///
/// Returns `false` for a wrong password and for any stored value that is
/// not a well-formed `{PKCS5S2}` hash.
#[must_use]
pub fn verify(password: &str, stored: &str) -> bool {
    let Some(encoded) = stored.strip_prefix(PREFIX) else {
        return false;
    };
    let Ok(raw) = STANDARD.decode(encoded) else {
        return false;
    };
    if raw.len() != SALT_LEN + KEY_LEN {
        return false;
    }

    let (salt, key) = raw.split_at(SALT_LEN);
    pbkdf2::verify(
        pbkdf2::PBKDF2_HMAC_SHA1,
        ITERATIONS,
        salt,
        password.as_bytes(),
        key,
    )
    .is_ok()
}
