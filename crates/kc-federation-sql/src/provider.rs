//! External database storage provider.
//!
//! ## Security Requirements
//!
//! - The external store is never written to
//! - Passwords are always checked against the store, never the cache
//! - Unsupported credential types and hash algorithms fail closed
//! - Passwords and hashes are never logged

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use kc_federation::config::FederationConfig;
use kc_federation::credential::{CredentialInput, CredentialType};
use kc_federation::error::{FederationError, FederationResult};
use kc_federation::provider::{
    CredentialInputUpdater, CredentialInputValidator, UserLookupProvider, UserStorageProvider,
};
use kc_federation::UserView;
use uuid::Uuid;

use crate::cache::IdentityCache;
use crate::config::ExternalDatabaseConfig;
use crate::dao::{SqlUserDao, UserDao};
use crate::mapper::ExternalUserRecord;
use crate::password::PasswordHashingAlgorithm;

/// Provider type identifier.
pub const PROVIDER_TYPE: &str = "external-database";

/// Message of the read-only error returned for password updates.
const READ_ONLY_MESSAGE: &str = "Users are read-only.";

/// Read-only user federation from an external database.
///
/// Resolves users through a [`UserDao`], caches them by username and checks
/// passwords against the hash stored in the external table.
///
/// ## Lifecycle
///
/// The provider owns the DAO's connection. The host calls
/// [`close`](UserStorageProvider::close) once the provider is retired;
/// the connection is released exactly once.
pub struct ExternalDatabaseStorageProvider<D = SqlUserDao> {
    /// Federation configuration.
    federation_config: FederationConfig,

    /// Hash format of stored passwords.
    hashing_algorithm: PasswordHashingAlgorithm,

    /// Access to the external store.
    dao: D,

    /// Resolved users.
    cache: IdentityCache,

    /// Set by the first `close`.
    closed: AtomicBool,
}

impl ExternalDatabaseStorageProvider<SqlUserDao> {
    /// Connects a provider to the external database named in the host
    /// component configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the database
    /// cannot be reached.
    pub async fn connect(federation_config: FederationConfig) -> FederationResult<Self> {
        let config = ExternalDatabaseConfig::from_federation_config(&federation_config)?;
        let dao = SqlUserDao::connect(&config).await?;
        Self::new(federation_config, config.hashing_algorithm, dao)
    }
}

impl<D: UserDao> ExternalDatabaseStorageProvider<D> {
    /// Creates a provider over an existing DAO.
    ///
    /// # Errors
    ///
    /// Returns `FederationError::Configuration` if the configuration asks
    /// for a writable edit mode, which this provider cannot honour.
    pub fn new(
        federation_config: FederationConfig,
        hashing_algorithm: PasswordHashingAlgorithm,
        dao: D,
    ) -> FederationResult<Self> {
        if federation_config.edit_mode.is_writable() {
            return Err(FederationError::config(
                "external database users are read-only; edit mode WRITABLE is not supported",
            ));
        }

        tracing::info!(
            provider = %federation_config.id,
            name = %federation_config.name,
            algorithm = %hashing_algorithm,
            cache_policy = ?federation_config.cache_policy,
            "External database user federation initialised"
        );

        Ok(Self {
            cache: IdentityCache::new(federation_config.cache_policy),
            federation_config,
            hashing_algorithm,
            dao,
            closed: AtomicBool::new(false),
        })
    }

    /// Returns the provider ID.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.federation_config.id
    }

    /// Returns the configured hashing algorithm.
    #[must_use]
    pub const fn hashing_algorithm(&self) -> PasswordHashingAlgorithm {
        self.hashing_algorithm
    }

    /// Returns the identity cache.
    #[must_use]
    pub const fn cache(&self) -> &IdentityCache {
        &self.cache
    }

    /// Returns the DAO.
    #[must_use]
    pub const fn dao(&self) -> &D {
        &self.dao
    }

    /// Drops the cached view of one user, so the next lookup refetches it.
    pub fn invalidate_user(&self, username: &str) -> bool {
        self.cache.invalidate(username)
    }

    /// Drops all cached users.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Returns true once the provider has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Builds the view handed to the host.
    fn create_adapter(&self, realm_id: Uuid, record: &ExternalUserRecord) -> Arc<UserView> {
        Arc::new(record.to_view(realm_id, &self.federation_config.id.to_string()))
    }
}

impl<D: UserDao> UserStorageProvider for ExternalDatabaseStorageProvider<D> {
    fn config(&self) -> &FederationConfig {
        &self.federation_config
    }

    fn provider_type(&self) -> &'static str {
        PROVIDER_TYPE
    }

    /// Releases the external connection.
    ///
    /// Only the first call releases; later calls return `Ok(())`. A failed
    /// release is returned, not retried.
    async fn close(&self) -> FederationResult<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            tracing::debug!(provider = %self.id(), "Provider already closed");
            return Ok(());
        }

        self.cache.clear();

        match self.dao.release_connection().await {
            Ok(()) => {
                tracing::info!(provider = %self.id(), "External database connection released");
                Ok(())
            }
            Err(err) => {
                tracing::error!(
                    provider = %self.id(),
                    error = %err,
                    "Failed to release external database connection"
                );
                Err(match err {
                    FederationError::ResourceRelease(_) => err,
                    other => FederationError::release(other.to_string()),
                })
            }
        }
    }
}

impl<D: UserDao> UserLookupProvider for ExternalDatabaseStorageProvider<D> {
    async fn get_user_by_username(
        &self,
        realm_id: Uuid,
        username: &str,
    ) -> FederationResult<Option<Arc<UserView>>> {
        if let Some(view) = self.cache.get(username) {
            tracing::debug!(username = %username, "Identity cache hit");
            return Ok(Some(view));
        }

        let Some(record) = self.dao.find_by_username(username).await? else {
            tracing::debug!(username = %username, "User not found in external database");
            return Ok(None);
        };

        let view = self.create_adapter(realm_id, &record);
        self.cache.insert(Arc::clone(&view));
        tracing::debug!(username = %username, "Loaded user from external database");

        Ok(Some(view))
    }

    async fn get_user_by_email(
        &self,
        realm_id: Uuid,
        email: &str,
    ) -> FederationResult<Option<Arc<UserView>>> {
        // Email is not the cache key; always ask the store.
        let record = self.dao.find_by_email(email).await?;
        if record.is_none() {
            tracing::debug!("No user with the given email in external database");
        }

        Ok(record.map(|record| self.create_adapter(realm_id, &record)))
    }
}

impl<D: UserDao> CredentialInputValidator for ExternalDatabaseStorageProvider<D> {
    fn supports_credential_type(&self, credential_type: CredentialType) -> bool {
        credential_type == CredentialType::Password
    }

    fn is_configured_for(
        &self,
        _realm_id: Uuid,
        _user: &UserView,
        credential_type: CredentialType,
    ) -> bool {
        self.supports_credential_type(credential_type)
    }

    /// Checks a password against the hash in the external table.
    ///
    /// The record is read from the store on every call, never from the
    /// cache.
    async fn is_valid(
        &self,
        _realm_id: Uuid,
        user: &UserView,
        input: &CredentialInput,
    ) -> FederationResult<bool> {
        if !self.supports_credential_type(input.credential_type()) {
            return Ok(false);
        }
        let Some(password) = input.challenge_response() else {
            return Ok(false);
        };

        let Some(record) = self.dao.find_by_username(user.username()).await? else {
            tracing::debug!(username = %user.username(), "Credential check for unknown user");
            return Ok(false);
        };

        let valid = self.hashing_algorithm.verify(password, &record.password_hash);
        tracing::debug!(username = %user.username(), valid, "Password checked");

        Ok(valid)
    }
}

impl<D: UserDao> CredentialInputUpdater for ExternalDatabaseStorageProvider<D> {
    async fn update_credential(
        &self,
        _realm_id: Uuid,
        user: &UserView,
        input: &CredentialInput,
    ) -> FederationResult<bool> {
        if self.supports_credential_type(input.credential_type()) {
            tracing::warn!(
                username = %user.username(),
                "Rejected password update for read-only external user"
            );
            return Err(FederationError::read_only(READ_ONLY_MESSAGE));
        }
        Ok(false)
    }

    async fn disable_credential_type(
        &self,
        _realm_id: Uuid,
        _user: &UserView,
        _credential_type: CredentialType,
    ) -> FederationResult<()> {
        Ok(())
    }

    fn get_disableable_credential_types(
        &self,
        _realm_id: Uuid,
        _user: &UserView,
    ) -> HashSet<CredentialType> {
        HashSet::new()
    }
}
