//! Federation error types.
//!
//! "Not found" is never an error in this crate: lookups return `None` and
//! credential checks return `false`. The variants below are the failures a
//! host has to act on.
//!
//! Error messages must not carry passwords or stored hashes.

use thiserror::Error;

/// Errors that can occur during federation operations.
#[derive(Debug, Error)]
pub enum FederationError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Connection error to the external store.
    #[error("Connection error: {0}")]
    Connection(String),

    /// User lookup error (query failed in the external store).
    #[error("User lookup error: {0}")]
    UserLookup(String),

    /// Operation not supported by this provider.
    #[error("Operation not supported: {0}")]
    NotSupported(String),

    /// The external store is read-only through this provider.
    #[error("Provider is read-only: {0}")]
    ReadOnly(String),

    /// The provider failed to release a resource it was given.
    #[error("Failed to release resource: {0}")]
    ResourceRelease(String),

    /// Internal error.
    #[error("Internal federation error: {0}")]
    Internal(String),
}

impl FederationError {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a user lookup error.
    #[must_use]
    pub fn lookup(msg: impl Into<String>) -> Self {
        Self::UserLookup(msg.into())
    }

    /// Creates a read-only error.
    #[must_use]
    pub fn read_only(msg: impl Into<String>) -> Self {
        Self::ReadOnly(msg.into())
    }

    /// Creates a not supported error.
    #[must_use]
    pub fn not_supported(operation: impl Into<String>) -> Self {
        Self::NotSupported(operation.into())
    }

    /// Creates a resource release error.
    #[must_use]
    pub fn release(msg: impl Into<String>) -> Self {
        Self::ResourceRelease(msg.into())
    }

    /// Checks if this is a read-only violation.
    #[must_use]
    pub const fn is_read_only(&self) -> bool {
        matches!(self, Self::ReadOnly(_))
    }

    /// Checks if this is a connection error.
    #[must_use]
    pub const fn is_connection_error(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Checks if this error is fatal for the provider instance.
    ///
    /// A provider that failed to release its connection or is misconfigured
    /// must be retired by the host.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::ResourceRelease(_) | Self::Configuration(_))
    }
}

/// Result type for federation operations.
pub type FederationResult<T> = Result<T, FederationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_categories() {
        assert!(FederationError::read_only("Users are read-only.").is_read_only());
        assert!(FederationError::connection("refused").is_connection_error());
        assert!(FederationError::release("close failed").is_fatal());
        assert!(FederationError::config("bad column").is_fatal());
        assert!(!FederationError::lookup("syntax error").is_fatal());
    }

    #[test]
    fn read_only_message() {
        let err = FederationError::read_only("Users are read-only.");
        assert_eq!(err.to_string(), "Provider is read-only: Users are read-only.");
    }
}
