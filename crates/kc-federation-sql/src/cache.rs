//! In-memory identity cache.
//!
//! Resolved users are kept by username so that repeated lookups do not go
//! back to the external store. Entries are never refreshed from the store;
//! the [`CachePolicy`] only bounds their age or their number.

use std::sync::Arc;
use std::time::Instant;

use dashmap::DashMap;
use kc_federation::{CachePolicy, UserView};
use parking_lot::Mutex;

#[derive(Debug)]
struct CacheEntry {
    view: Arc<UserView>,
    inserted_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, policy: &CachePolicy) -> bool {
        policy
            .max_lifespan()
            .is_some_and(|lifespan| self.inserted_at.elapsed() >= lifespan)
    }
}

/// Cache of resolved users, keyed by username.
///
/// Safe for concurrent use. Two callers that miss on the same username at
/// the same time may both insert; the later insert wins and both values
/// describe the same record.
#[derive(Debug)]
pub struct IdentityCache {
    policy: CachePolicy,
    entries: DashMap<String, CacheEntry>,
    /// Serialises inserts under a size bound so the bound holds.
    bounded_insert: Mutex<()>,
}

impl IdentityCache {
    /// Creates an empty cache with the given policy.
    #[must_use]
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            policy,
            entries: DashMap::new(),
            bounded_insert: Mutex::new(()),
        }
    }

    /// Returns the cache policy.
    #[must_use]
    pub const fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Gets the cached view for a username.
    ///
    /// Expired entries are removed and reported as a miss.
    #[must_use]
    pub fn get(&self, username: &str) -> Option<Arc<UserView>> {
        if self.policy.is_disabled() {
            return None;
        }

        let entry = self.entries.get(username)?;
        if !entry.is_expired(&self.policy) {
            return Some(Arc::clone(&entry.view));
        }
        drop(entry);

        self.entries
            .remove_if(username, |_, entry| entry.is_expired(&self.policy));
        None
    }

    /// Caches a view under its username.
    ///
    /// The key is always the view's own username, so a hit for `U` returns
    /// a view of user `U`. A lookup whose store matched a different spelling
    /// (for example `BOB` finding record `bob` in a case-insensitive store)
    /// is therefore never served from the cache and always queries the store.
    pub fn insert(&self, view: Arc<UserView>) {
        if self.policy.is_disabled() {
            return;
        }

        let username = view.username().to_string();
        let entry = CacheEntry {
            view,
            inserted_at: Instant::now(),
        };

        let Some(max_entries) = self.policy.max_entries() else {
            self.entries.insert(username, entry);
            return;
        };
        if max_entries == 0 {
            return;
        }

        let _guard = self.bounded_insert.lock();
        if !self.entries.contains_key(&username) {
            while self.entries.len() >= max_entries {
                if !self.evict_oldest() {
                    break;
                }
            }
        }
        self.entries.insert(username, entry);
    }

    /// Removes the entry for a username.
    ///
    /// Returns true if an entry was removed.
    pub fn invalidate(&self, username: &str) -> bool {
        self.entries.remove(username).is_some()
    }

    /// Removes all entries.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Returns the number of cached users, including expired entries that
    /// have not been looked up since they expired.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if a username has an entry (expired or not).
    #[must_use]
    pub fn contains(&self, username: &str) -> bool {
        self.entries.contains_key(username)
    }

    fn evict_oldest(&self) -> bool {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|entry| entry.inserted_at)
            .map(|entry| entry.key().clone());

        match oldest {
            Some(username) => {
                tracing::debug!(username = %username, "Evicting cached user");
                self.entries.remove(&username).is_some()
            }
            None => false,
        }
    }
}

impl Default for IdentityCache {
    fn default() -> Self {
        Self::new(CachePolicy::default())
    }
}
