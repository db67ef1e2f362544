//! User storage provider traits.
//!
//! ## NIST 800-53 Rev5 Controls
//!
//! - IA-2: Identification and Authentication (Organizational Users)
//! - IA-5: Authenticator Management
//!
//! These traits let the host resolve users from an external identity store
//! and check their credentials there. A provider implements the subset that
//! matches what the store can do.

use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use crate::config::FederationConfig;
use crate::credential::{CredentialInput, CredentialType};
use crate::error::FederationResult;
use crate::storage_id::StorageId;
use crate::user::UserView;

// ============================================================================
// User Storage Provider
// ============================================================================

/// Base trait for user storage federation providers.
///
/// ## Implementation Notes
///
/// - Providers must be thread-safe (Send + Sync); the host calls them from
///   whatever task serves the request
/// - Providers own the resources they were given and release them in
///   [`close`](Self::close)
#[allow(async_fn_in_trait)]
pub trait UserStorageProvider: Send + Sync {
    /// Returns the provider configuration.
    fn config(&self) -> &FederationConfig;

    /// Returns the provider type identifier.
    fn provider_type(&self) -> &'static str;

    /// Closes the provider, releasing any resources.
    ///
    /// The host calls this once, after the provider has been retired.
    /// A failure means a resource leaked and must reach the host.
    async fn close(&self) -> FederationResult<()> {
        Ok(())
    }
}

// ============================================================================
// User Lookup
// ============================================================================

/// Resolves users from the external store.
///
/// A user that does not exist is `Ok(None)`, never an error.
#[allow(async_fn_in_trait)]
pub trait UserLookupProvider: Send + Sync {
    /// Gets a user by host id.
    ///
    /// The default implementation extracts the external id from the
    /// [`StorageId`] and looks the user up by username.
    async fn get_user_by_id(
        &self,
        realm_id: Uuid,
        id: &str,
    ) -> FederationResult<Option<Arc<UserView>>> {
        let storage_id = StorageId::parse(id);
        self.get_user_by_username(realm_id, storage_id.external_id())
            .await
    }

    /// Gets a user by username.
    async fn get_user_by_username(
        &self,
        realm_id: Uuid,
        username: &str,
    ) -> FederationResult<Option<Arc<UserView>>>;

    /// Gets a user by email.
    async fn get_user_by_email(
        &self,
        realm_id: Uuid,
        email: &str,
    ) -> FederationResult<Option<Arc<UserView>>>;
}

// ============================================================================
// Credential Validation
// ============================================================================

/// Validates credentials against the external store.
///
/// ## NIST 800-53 Rev5: IA-5
///
/// Credential validators must:
/// - Not log or store plaintext passwords
/// - Fail closed: anything they cannot check is invalid
#[allow(async_fn_in_trait)]
pub trait CredentialInputValidator: Send + Sync {
    /// Checks if the provider can validate the given credential type.
    fn supports_credential_type(&self, credential_type: CredentialType) -> bool;

    /// Checks if the user has a credential of the given type configured.
    fn is_configured_for(
        &self,
        realm_id: Uuid,
        user: &UserView,
        credential_type: CredentialType,
    ) -> bool;

    /// Validates a submitted credential.
    ///
    /// Returns `Ok(false)` for wrong, unsupported or malformed input and
    /// for users the store does not know. Errors are reserved for failures
    /// of the store itself.
    async fn is_valid(
        &self,
        realm_id: Uuid,
        user: &UserView,
        input: &CredentialInput,
    ) -> FederationResult<bool>;
}

// ============================================================================
// Credential Updates
// ============================================================================

/// Updates or disables credentials in the external store.
#[allow(async_fn_in_trait)]
pub trait CredentialInputUpdater: Send + Sync {
    /// Updates a credential.
    ///
    /// Returns `Ok(true)` if the credential was updated, `Ok(false)` if this
    /// provider does not handle the credential type.
    ///
    /// Returns `FederationError::ReadOnly` if the store cannot be written.
    async fn update_credential(
        &self,
        realm_id: Uuid,
        user: &UserView,
        input: &CredentialInput,
    ) -> FederationResult<bool>;

    /// Disables all credentials of a type for the user.
    async fn disable_credential_type(
        &self,
        realm_id: Uuid,
        user: &UserView,
        credential_type: CredentialType,
    ) -> FederationResult<()>;

    /// Returns the credential types that can be disabled for the user.
    fn get_disableable_credential_types(
        &self,
        realm_id: Uuid,
        user: &UserView,
    ) -> HashSet<CredentialType>;
}
