//! Host-facing view of a federated user.

use serde::Serialize;
use uuid::Uuid;

use crate::storage_id::StorageId;

/// A read-only projection of a user owned by an external store.
///
/// Views are built once from the external record and never change
/// afterwards. Providers hand them out as `Arc<UserView>`, so the same view
/// may be shared between a provider cache and any number of host requests.
/// There are no setters; credential changes go through
/// [`CredentialInputUpdater`](crate::CredentialInputUpdater), which refuses
/// them for read-only stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserView {
    id: String,
    realm_id: Uuid,
    federation_link: String,
    username: String,
    email: Option<String>,
}

impl UserView {
    /// Creates a view of an external user.
    ///
    /// `federation_link` is the id of the provider component that resolved
    /// the user; it also forms the user's storage id.
    #[must_use]
    pub fn new(
        realm_id: Uuid,
        federation_link: impl Into<String>,
        username: impl Into<String>,
        email: Option<String>,
    ) -> Self {
        let federation_link = federation_link.into();
        let username = username.into();
        Self {
            id: StorageId::federated(&federation_link, &username),
            realm_id,
            federation_link,
            username,
            email,
        }
    }

    /// Returns the host id (`f:<provider-id>:<username>`).
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the realm the user was resolved in.
    #[must_use]
    pub const fn realm_id(&self) -> Uuid {
        self.realm_id
    }

    /// Returns the id of the provider that owns this user.
    #[must_use]
    pub fn federation_link(&self) -> &str {
        &self.federation_link
    }

    /// Returns the username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the email address, if the external store has one.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}
