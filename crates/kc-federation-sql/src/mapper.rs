//! Mapping of external user rows to host user views.

use std::fmt;

use kc_federation::UserView;
use sqlx::FromRow;
use uuid::Uuid;

/// A user as stored in the external table.
///
/// Owned by the external store; the provider only reads and wraps it.
#[derive(Clone, PartialEq, Eq, FromRow)]
pub struct ExternalUserRecord {
    /// Unique username.
    pub username: String,
    /// Email address, if the column is set.
    pub email: Option<String>,
    /// Stored password hash.
    pub password_hash: String,
}

impl ExternalUserRecord {
    /// Creates a record.
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        email: Option<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email,
            password_hash: password_hash.into(),
        }
    }

    /// Builds the host-facing view of this record.
    ///
    /// The view captures the username and email as they are now; later
    /// changes in the external store are not reflected.
    #[must_use]
    pub fn to_view(&self, realm_id: Uuid, federation_link: &str) -> UserView {
        UserView::new(
            realm_id,
            federation_link,
            self.username.as_str(),
            self.email.clone(),
        )
    }
}

impl fmt::Debug for ExternalUserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternalUserRecord")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}
