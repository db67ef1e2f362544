//! Data access for the external user table.
//!
//! [`UserDao`] is the whole contract the provider needs from the external
//! store: two lookups and a way to give the connection back. [`SqlUserDao`]
//! implements it over one PostgreSQL connection.

use std::future::Future;

use kc_federation::FederationResult;

use crate::config::ExternalDatabaseConfig;
use crate::connection::SqlConnection;
use crate::error::{ExternalDbResult, from_sqlx_error};
use crate::mapper::ExternalUserRecord;

/// Read access to an external user store.
///
/// Implementations must be safe to call concurrently. A lookup that finds
/// nothing returns `Ok(None)`.
pub trait UserDao: Send + Sync {
    /// Finds the user with exactly this username.
    fn find_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = FederationResult<Option<ExternalUserRecord>>> + Send;

    /// Finds a user with this email address.
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = FederationResult<Option<ExternalUserRecord>>> + Send;

    /// Releases the connection to the store.
    ///
    /// Called at most once per provider. A failure is
    /// `FederationError::ResourceRelease`.
    fn release_connection(&self) -> impl Future<Output = FederationResult<()>> + Send;
}

/// `PostgreSQL` implementation of [`UserDao`].
#[derive(Debug)]
pub struct SqlUserDao {
    connection: SqlConnection,
    queries: UserQueries,
}

impl SqlUserDao {
    /// Connects to the store described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the connection
    /// cannot be opened.
    pub async fn connect(config: &ExternalDatabaseConfig) -> ExternalDbResult<Self> {
        let queries = UserQueries::new(config)?;
        let connection = SqlConnection::connect(config).await?;
        Ok(Self {
            connection,
            queries,
        })
    }

    /// Creates a DAO over an open connection.
    ///
    /// # Errors
    ///
    /// Returns `ExternalDbError::InvalidIdentifier` or
    /// `ExternalDbError::Configuration` if `config` does not validate.
    pub fn new(
        config: &ExternalDatabaseConfig,
        connection: SqlConnection,
    ) -> ExternalDbResult<Self> {
        Ok(Self {
            connection,
            queries: UserQueries::new(config)?,
        })
    }

    async fn fetch_one(
        &self,
        sql: &str,
        value: &str,
    ) -> ExternalDbResult<Option<ExternalUserRecord>> {
        let mut guard = self.connection.acquire().await?;
        let connection = guard.connection()?;

        sqlx::query_as::<_, ExternalUserRecord>(sql)
            .bind(value)
            .fetch_optional(connection)
            .await
            .map_err(from_sqlx_error)
    }
}

impl UserDao for SqlUserDao {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> FederationResult<Option<ExternalUserRecord>> {
        Ok(self.fetch_one(&self.queries.by_username, username).await?)
    }

    async fn find_by_email(&self, email: &str) -> FederationResult<Option<ExternalUserRecord>> {
        Ok(self.fetch_one(&self.queries.by_email, email).await?)
    }

    async fn release_connection(&self) -> FederationResult<()> {
        if !self.connection.release().await? {
            tracing::debug!("External database connection was already released");
        }
        Ok(())
    }
}

/// Lookup statements for one validated configuration.
#[derive(Debug)]
struct UserQueries {
    by_username: String,
    by_email: String,
}

impl UserQueries {
    /// Validates `config` and builds its statements.
    ///
    /// Identifiers are placed into the SQL text, so nothing is built from a
    /// configuration that fails [`ExternalDatabaseConfig::validate`].
    fn new(config: &ExternalDatabaseConfig) -> ExternalDbResult<Self> {
        config.validate()?;
        Ok(Self {
            by_username: select_user_sql(config, &config.username_column),
            by_email: select_user_sql(config, &config.email_column),
        })
    }
}

/// Builds the lookup statement for one key column.
fn select_user_sql(config: &ExternalDatabaseConfig, key_column: &str) -> String {
    format!(
        "SELECT {username} AS username, {email} AS email, {password} AS password_hash \
         FROM {table} WHERE {key_column} = $1 LIMIT 1",
        username = config.username_column,
        email = config.email_column,
        password = config.password_column,
        table = config.user_table,
    )
}
