//! External database provider configuration.
//!
//! ## Security Requirements
//!
//! Table and column names are interpolated into SQL, so they are restricted
//! to plain identifiers (`[A-Za-z_][A-Za-z0-9_]*`, optionally qualified with
//! one schema). Lookup values are always bound as parameters.

use std::time::Duration;

use kc_federation::FederationConfig;
use serde::Serialize;

use crate::error::{ExternalDbError, ExternalDbResult};
use crate::password::PasswordHashingAlgorithm;

/// Keys of the provider settings in [`FederationConfig::config`].
pub mod keys {
    /// PostgreSQL connection URL.
    pub const CONNECTION_URL: &str = "connectionUrl";
    /// Table holding the users.
    pub const USER_TABLE: &str = "userTable";
    /// Column holding the unique username.
    pub const USERNAME_COLUMN: &str = "usernameColumn";
    /// Column holding the email address.
    pub const EMAIL_COLUMN: &str = "emailColumn";
    /// Column holding the password hash.
    pub const PASSWORD_COLUMN: &str = "passwordColumn";
    /// Hash format of the password column.
    pub const PASSWORD_HASHING_ALGORITHM: &str = "passwordHashingAlgorithm";
}

/// External database provider configuration.
///
/// Build it with [`builder`](Self::builder) or
/// [`from_federation_config`](Self::from_federation_config); both validate.
/// Serializes without the connection URL and is not deserializable.
#[derive(Debug, Clone, Serialize)]
pub struct ExternalDatabaseConfig {
    // === Connection ===
    /// PostgreSQL connection URL (may embed credentials).
    #[serde(skip_serializing)]
    pub connection_url: String,

    /// Connection timeout.
    pub connection_timeout: Duration,

    // === Schema ===
    /// Table holding the users.
    pub user_table: String,

    /// Column holding the unique username.
    pub username_column: String,

    /// Column holding the email address.
    pub email_column: String,

    /// Column holding the password hash.
    pub password_column: String,

    // === Credentials ===
    /// Hash format of the password column.
    pub hashing_algorithm: PasswordHashingAlgorithm,
}

impl ExternalDatabaseConfig {
    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> ExternalDatabaseConfigBuilder {
        ExternalDatabaseConfigBuilder::new()
    }

    /// Reads the provider settings from a host component configuration.
    ///
    /// Missing schema settings fall back to the builder defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection URL is missing, the hashing
    /// algorithm is unknown or validation fails.
    pub fn from_federation_config(config: &FederationConfig) -> ExternalDbResult<Self> {
        let mut builder = Self::builder().connection_timeout(config.connection_timeout);

        if let Some(url) = config.get_non_blank(keys::CONNECTION_URL) {
            builder = builder.connection_url(url);
        }
        if let Some(table) = config.get_non_blank(keys::USER_TABLE) {
            builder = builder.user_table(table);
        }
        if let Some(column) = config.get_non_blank(keys::USERNAME_COLUMN) {
            builder = builder.username_column(column);
        }
        if let Some(column) = config.get_non_blank(keys::EMAIL_COLUMN) {
            builder = builder.email_column(column);
        }
        if let Some(column) = config.get_non_blank(keys::PASSWORD_COLUMN) {
            builder = builder.password_column(column);
        }
        if let Some(algorithm) = config.get_non_blank(keys::PASSWORD_HASHING_ALGORITHM) {
            builder = builder.hashing_algorithm(algorithm.parse()?);
        }

        builder.build()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not a PostgreSQL URL or a table or
    /// column name is not a plain identifier.
    pub fn validate(&self) -> ExternalDbResult<()> {
        if self.connection_url.is_empty() {
            return Err(ExternalDbError::config("connection_url cannot be empty"));
        }
        if !(self.connection_url.starts_with("postgres://")
            || self.connection_url.starts_with("postgresql://"))
        {
            return Err(ExternalDbError::config(
                "connection_url must start with 'postgres://' or 'postgresql://'",
            ));
        }

        validate_table_name(keys::USER_TABLE, &self.user_table)?;
        validate_identifier(keys::USERNAME_COLUMN, &self.username_column)?;
        validate_identifier(keys::EMAIL_COLUMN, &self.email_column)?;
        validate_identifier(keys::PASSWORD_COLUMN, &self.password_column)?;

        Ok(())
    }
}

/// Checks a column name.
fn validate_identifier(field: &'static str, value: &str) -> ExternalDbResult<()> {
    if is_identifier(value) {
        Ok(())
    } else {
        Err(ExternalDbError::InvalidIdentifier {
            field,
            value: value.to_string(),
        })
    }
}

/// Checks a table name, allowing one `schema.` qualifier.
fn validate_table_name(field: &'static str, value: &str) -> ExternalDbResult<()> {
    let valid = match value.split_once('.') {
        Some((schema, table)) => is_identifier(schema) && is_identifier(table),
        None => is_identifier(value),
    };
    if valid {
        Ok(())
    } else {
        Err(ExternalDbError::InvalidIdentifier {
            field,
            value: value.to_string(),
        })
    }
}

fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Builder for `ExternalDatabaseConfig`.
#[derive(Debug)]
pub struct ExternalDatabaseConfigBuilder {
    connection_url: Option<String>,
    connection_timeout: Duration,
    user_table: String,
    username_column: String,
    email_column: String,
    password_column: String,
    hashing_algorithm: PasswordHashingAlgorithm,
}

impl Default for ExternalDatabaseConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ExternalDatabaseConfigBuilder {
    /// Creates a new builder with default schema names.
    #[must_use]
    pub fn new() -> Self {
        Self {
            connection_url: None,
            connection_timeout: Duration::from_secs(5),
            user_table: "users".to_string(),
            username_column: "username".to_string(),
            email_column: "email".to_string(),
            password_column: "password".to_string(),
            hashing_algorithm: PasswordHashingAlgorithm::default(),
        }
    }

    /// Sets the connection URL.
    #[must_use]
    pub fn connection_url(mut self, url: impl Into<String>) -> Self {
        self.connection_url = Some(url.into());
        self
    }

    /// Sets the connection timeout.
    #[must_use]
    pub const fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Sets the user table.
    #[must_use]
    pub fn user_table(mut self, table: impl Into<String>) -> Self {
        self.user_table = table.into();
        self
    }

    /// Sets the username column.
    #[must_use]
    pub fn username_column(mut self, column: impl Into<String>) -> Self {
        self.username_column = column.into();
        self
    }

    /// Sets the email column.
    #[must_use]
    pub fn email_column(mut self, column: impl Into<String>) -> Self {
        self.email_column = column.into();
        self
    }

    /// Sets the password hash column.
    #[must_use]
    pub fn password_column(mut self, column: impl Into<String>) -> Self {
        self.password_column = column.into();
        self
    }

    /// Sets the password hashing algorithm.
    #[must_use]
    pub const fn hashing_algorithm(mut self, algorithm: PasswordHashingAlgorithm) -> Self {
        self.hashing_algorithm = algorithm;
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection URL is missing or validation fails.
    pub fn build(self) -> ExternalDbResult<ExternalDatabaseConfig> {
        let config = ExternalDatabaseConfig {
            connection_url: self
                .connection_url
                .ok_or_else(|| ExternalDbError::config("connection_url is required"))?,
            connection_timeout: self.connection_timeout,
            user_table: self.user_table,
            username_column: self.username_column,
            email_column: self.email_column,
            password_column: self.password_column,
            hashing_algorithm: self.hashing_algorithm,
        };

        config.validate()?;
        Ok(config)
    }
}
