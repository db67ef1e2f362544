//! External database error types.
//!
//! ## Security Note
//!
//! Error messages must not leak connection credentials, passwords or
//! stored hashes.

use kc_federation::FederationError;
use sqlx::Error as SqlxError;
use thiserror::Error;

/// External database errors.
#[derive(Debug, Error)]
pub enum ExternalDbError {
    /// Invalid configuration.
    #[error("External database configuration error: {0}")]
    Configuration(String),

    /// A configured table or column name is not a plain SQL identifier.
    #[error("Invalid SQL identifier for {field}: '{value}'")]
    InvalidIdentifier {
        /// Configuration field holding the identifier.
        field: &'static str,
        /// Rejected value.
        value: String,
    },

    /// Connection failed.
    #[error("External database connection failed: {0}")]
    Connection(String),

    /// The connection was released and can no longer be used.
    #[error("External database connection already released")]
    ConnectionReleased,

    /// Connecting took longer than the configured timeout.
    #[error("External database connection timed out")]
    Timeout,

    /// Query failed.
    #[error("External database query failed: {0}")]
    Query(String),

    /// Closing the connection failed.
    #[error("Failed to close external database connection: {0}")]
    Release(String),
}

impl ExternalDbError {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Checks if this is a connection-related error.
    #[must_use]
    pub const fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::Connection(_) | Self::ConnectionReleased | Self::Timeout
        )
    }
}

/// Result type for external database operations.
pub type ExternalDbResult<T> = Result<T, ExternalDbError>;

/// Converts a `SQLx` error into an external database error.
#[allow(clippy::needless_pass_by_value)]
pub fn from_sqlx_error(err: SqlxError) -> ExternalDbError {
    match err {
        SqlxError::Configuration(e) => ExternalDbError::Configuration(e.to_string()),
        SqlxError::Io(e) => ExternalDbError::Connection(e.to_string()),
        SqlxError::Tls(e) => ExternalDbError::Connection(e.to_string()),
        SqlxError::PoolTimedOut => ExternalDbError::Timeout,
        SqlxError::PoolClosed => ExternalDbError::ConnectionReleased,
        SqlxError::Database(db_err) => ExternalDbError::Query(db_err.message().to_string()),
        other => ExternalDbError::Query(other.to_string()),
    }
}

impl From<ExternalDbError> for FederationError {
    fn from(err: ExternalDbError) -> Self {
        match err {
            ExternalDbError::Configuration(msg) => Self::Configuration(msg),
            ExternalDbError::InvalidIdentifier { .. } => Self::Configuration(err.to_string()),
            ExternalDbError::Connection(msg) => Self::Connection(msg),
            ExternalDbError::ConnectionReleased | ExternalDbError::Timeout => {
                Self::Connection(err.to_string())
            }
            ExternalDbError::Query(msg) => Self::UserLookup(msg),
            ExternalDbError::Release(msg) => Self::ResourceRelease(msg),
        }
    }
}
