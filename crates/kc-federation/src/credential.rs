//! Credential types and submitted credential input.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FederationError;

/// Credential type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CredentialType {
    /// Password credential.
    Password,
    /// TOTP (Time-based One-Time Password) credential.
    #[serde(rename = "otp")]
    Totp,
    /// HOTP (HMAC-based One-Time Password) credential.
    Hotp,
    /// `WebAuthn` credential.
    Webauthn,
    /// `WebAuthn` passwordless credential.
    WebauthnPasswordless,
    /// Recovery codes.
    #[serde(rename = "recovery-authn-codes")]
    RecoveryCodes,
}

impl CredentialType {
    /// Returns the string representation used by the host.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Password => "password",
            Self::Totp => "otp",
            Self::Hotp => "hotp",
            Self::Webauthn => "webauthn",
            Self::WebauthnPasswordless => "webauthn-passwordless",
            Self::RecoveryCodes => "recovery-authn-codes",
        }
    }
}

impl fmt::Display for CredentialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CredentialType {
    type Err = FederationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "password" => Ok(Self::Password),
            "otp" => Ok(Self::Totp),
            "hotp" => Ok(Self::Hotp),
            "webauthn" => Ok(Self::Webauthn),
            "webauthn-passwordless" => Ok(Self::WebauthnPasswordless),
            "recovery-authn-codes" => Ok(Self::RecoveryCodes),
            other => Err(FederationError::not_supported(format!(
                "credential type '{other}'"
            ))),
        }
    }
}

/// A credential submitted by the host for validation or update.
///
/// The secret inside is never logged; `Debug` redacts it.
#[derive(Clone)]
pub enum CredentialInput {
    /// A secret typed by the user, such as a password.
    UserCredential {
        /// Credential type.
        credential_type: CredentialType,
        /// The submitted secret.
        challenge_response: String,
    },

    /// An already-encoded credential (e.g. an imported hash).
    Stored {
        /// Credential type.
        credential_type: CredentialType,
        /// Encoded credential data.
        credential_data: String,
    },
}

impl CredentialInput {
    /// Creates a password input from a submitted secret.
    #[must_use]
    pub fn password(secret: impl Into<String>) -> Self {
        Self::UserCredential {
            credential_type: CredentialType::Password,
            challenge_response: secret.into(),
        }
    }

    /// Creates a user credential input of any type.
    #[must_use]
    pub fn user_credential(credential_type: CredentialType, secret: impl Into<String>) -> Self {
        Self::UserCredential {
            credential_type,
            challenge_response: secret.into(),
        }
    }

    /// Returns the credential type.
    #[must_use]
    pub const fn credential_type(&self) -> CredentialType {
        match self {
            Self::UserCredential {
                credential_type, ..
            }
            | Self::Stored {
                credential_type, ..
            } => *credential_type,
        }
    }

    /// Returns the submitted secret if this is a user credential.
    #[must_use]
    pub fn challenge_response(&self) -> Option<&str> {
        match self {
            Self::UserCredential {
                challenge_response, ..
            } => Some(challenge_response),
            Self::Stored { .. } => None,
        }
    }
}

impl fmt::Debug for CredentialInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UserCredential {
                credential_type, ..
            } => f
                .debug_struct("UserCredential")
                .field("credential_type", credential_type)
                .field("challenge_response", &"[REDACTED]")
                .finish(),
            Self::Stored {
                credential_type, ..
            } => f
                .debug_struct("Stored")
                .field("credential_type", credential_type)
                .field("credential_data", &"[REDACTED]")
                .finish(),
        }
    }
}
