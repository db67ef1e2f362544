//! External database connection handle.
//!
//! Each provider owns exactly one connection to the external store. The
//! handle hands it out for one statement at a time and releases it once,
//! when the provider is closed. Dropping the handle without releasing still
//! drops the socket.

use std::str::FromStr;

use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;
use tokio::sync::{Mutex, MutexGuard};

use crate::config::ExternalDatabaseConfig;
use crate::error::{ExternalDbError, ExternalDbResult, from_sqlx_error};

/// Single connection to the external store.
#[derive(Debug)]
pub struct SqlConnection {
    /// `None` once released.
    connection: Mutex<Option<PgConnection>>,
}

impl SqlConnection {
    /// Opens a connection using the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed, the server cannot be
    /// reached or connecting takes longer than the configured timeout.
    pub async fn connect(config: &ExternalDatabaseConfig) -> ExternalDbResult<Self> {
        let options = PgConnectOptions::from_str(&config.connection_url).map_err(from_sqlx_error)?;

        let connection = tokio::time::timeout(
            config.connection_timeout,
            PgConnection::connect_with(&options),
        )
        .await
        .map_err(|_| ExternalDbError::Timeout)?
        .map_err(from_sqlx_error)?;

        Ok(Self::from_connection(connection))
    }

    /// Wraps an already open connection.
    #[must_use]
    pub fn from_connection(connection: PgConnection) -> Self {
        Self {
            connection: Mutex::new(Some(connection)),
        }
    }

    /// Acquires the connection for one statement.
    ///
    /// Statements on the same provider run one after another.
    ///
    /// # Errors
    ///
    /// Returns `ExternalDbError::ConnectionReleased` after [`release`](Self::release).
    pub async fn acquire(&self) -> ExternalDbResult<ConnectionGuard<'_>> {
        let guard = self.connection.lock().await;
        if guard.is_none() {
            return Err(ExternalDbError::ConnectionReleased);
        }
        Ok(ConnectionGuard { guard })
    }

    /// Closes the connection.
    ///
    /// Returns `Ok(true)` if this call closed it and `Ok(false)` if it was
    /// already released.
    ///
    /// # Errors
    ///
    /// Returns `ExternalDbError::Release` if the server did not acknowledge
    /// the close. The connection is gone either way.
    pub async fn release(&self) -> ExternalDbResult<bool> {
        let Some(connection) = self.connection.lock().await.take() else {
            return Ok(false);
        };

        connection
            .close()
            .await
            .map_err(|e| ExternalDbError::Release(e.to_string()))?;

        Ok(true)
    }
}

/// Exclusive access to the open connection.
pub struct ConnectionGuard<'a> {
    guard: MutexGuard<'a, Option<PgConnection>>,
}

impl ConnectionGuard<'_> {
    /// Returns the connection.
    ///
    /// # Errors
    ///
    /// Returns `ExternalDbError::ConnectionReleased` if the slot is empty.
    pub fn connection(&mut self) -> ExternalDbResult<&mut PgConnection> {
        self.guard
            .as_mut()
            .ok_or(ExternalDbError::ConnectionReleased)
    }
}
