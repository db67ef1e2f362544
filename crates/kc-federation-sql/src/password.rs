//! Password hash verification for stored external hashes.
//!
//! The hashing algorithm is chosen once, when the provider is configured.
//! Verification is an exhaustive match over [`PasswordHashingAlgorithm`]:
//! an algorithm without a verifier rejects every password.

use std::fmt;
use std::str::FromStr;

use kc_crypto::pkcs5s2;
use serde::{Deserialize, Serialize};

use crate::error::ExternalDbError;

/// Hash format of the password column in the external store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PasswordHashingAlgorithm {
    /// `{PKCS5S2}` PBKDF2-HMAC-SHA1 hashes.
    #[default]
    #[serde(rename = "PKCS5S2")]
    Pkcs5S2,

    /// bcrypt hashes. Recognised in configuration; no verifier exists, so
    /// every password is rejected.
    Bcrypt,
}

impl PasswordHashingAlgorithm {
    /// Returns the configuration name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pkcs5S2 => "PKCS5S2",
            Self::Bcrypt => "BCRYPT",
        }
    }

    /// Returns true if passwords stored with this algorithm can be verified.
    #[must_use]
    pub const fn is_supported(&self) -> bool {
        matches!(self, Self::Pkcs5S2)
    }

    /// Verifies a submitted password against a stored hash.
    ///
    /// Never fails: malformed hashes and unsupported algorithms are
    /// rejected. The password is never logged.
    #[must_use]
    pub fn verify(&self, password: &str, stored_hash: &str) -> bool {
        match self {
            Self::Pkcs5S2 => {
                if !pkcs5s2::can_decode(stored_hash) {
                    tracing::warn!(
                        algorithm = self.as_str(),
                        "Stored password hash is not in the configured format"
                    );
                    return false;
                }
                pkcs5s2::verify(password, stored_hash)
            }
            Self::Bcrypt => {
                tracing::warn!(
                    algorithm = self.as_str(),
                    "No verifier for configured password hashing algorithm, rejecting credential"
                );
                false
            }
        }
    }
}

impl fmt::Display for PasswordHashingAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PasswordHashingAlgorithm {
    type Err = ExternalDbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PKCS5S2" => Ok(Self::Pkcs5S2),
            "BCRYPT" => Ok(Self::Bcrypt),
            other => Err(ExternalDbError::config(format!(
                "unknown password hashing algorithm '{other}'. Supported: PKCS5S2, BCRYPT"
            ))),
        }
    }
}
