//! In-memory user store.
//!
//! Implements [`UserDao`] over a map for tests. It counts the queries it
//! serves so callers can observe cache behaviour, and can be told to fail
//! its release. Only built for this crate's tests and with the `test-util`
//! feature.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use kc_federation::{FederationError, FederationResult};
use parking_lot::RwLock;

use crate::dao::UserDao;
use crate::mapper::ExternalUserRecord;

/// [`UserDao`] backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct InMemoryUserDao {
    users: RwLock<HashMap<String, ExternalUserRecord>>,
    username_queries: AtomicUsize,
    email_queries: AtomicUsize,
    releases: AtomicUsize,
    released: AtomicBool,
    fail_release: AtomicBool,
}

impl InMemoryUserDao {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a user (builder form).
    #[must_use]
    pub fn with_user(self, record: ExternalUserRecord) -> Self {
        self.insert(record);
        self
    }

    /// Adds or replaces a user.
    pub fn insert(&self, record: ExternalUserRecord) {
        self.users.write().insert(record.username.clone(), record);
    }

    /// Removes a user.
    pub fn remove(&self, username: &str) -> Option<ExternalUserRecord> {
        self.users.write().remove(username)
    }

    /// Makes the next release fail.
    pub fn fail_release(&self, fail: bool) {
        self.fail_release.store(fail, Ordering::SeqCst);
    }

    /// Number of username lookups served.
    #[must_use]
    pub fn username_queries(&self) -> usize {
        self.username_queries.load(Ordering::SeqCst)
    }

    /// Number of email lookups served.
    #[must_use]
    pub fn email_queries(&self) -> usize {
        self.email_queries.load(Ordering::SeqCst)
    }

    /// Number of release attempts.
    #[must_use]
    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    /// Returns true once the store has been released.
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> FederationResult<()> {
        if self.is_released() {
            return Err(FederationError::connection("connection already released"));
        }
        Ok(())
    }
}

impl UserDao for InMemoryUserDao {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> FederationResult<Option<ExternalUserRecord>> {
        self.ensure_open()?;
        self.username_queries.fetch_add(1, Ordering::SeqCst);
        Ok(self.users.read().get(username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> FederationResult<Option<ExternalUserRecord>> {
        self.ensure_open()?;
        self.email_queries.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .users
            .read()
            .values()
            .find(|record| record.email.as_deref() == Some(email))
            .cloned())
    }

    async fn release_connection(&self) -> FederationResult<()> {
        self.releases.fetch_add(1, Ordering::SeqCst);
        if self.fail_release.load(Ordering::SeqCst) {
            return Err(FederationError::release("in-memory store refused to close"));
        }
        self.released.store(true, Ordering::SeqCst);
        Ok(())
    }
}
