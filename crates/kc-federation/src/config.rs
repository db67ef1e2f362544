//! Federation provider configuration.
//!
//! Configuration types for user federation providers. The host stores one
//! [`FederationConfig`] per configured provider component; provider-specific
//! settings travel in its string map.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{FederationError, FederationResult};

/// Edit mode for federated users.
///
/// Controls whether changes to users are written back to the external store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EditMode {
    /// Users are read-only. Changes are never written back.
    #[default]
    ReadOnly,

    /// Users are writable. Changes are written back to the external store.
    Writable,

    /// Changes are stored by the host and not written back.
    Unsynced,
}

impl EditMode {
    /// Returns true if the mode allows writes to the external store.
    #[must_use]
    pub const fn is_writable(&self) -> bool {
        matches!(self, Self::Writable)
    }

    /// Returns true if the mode is read-only.
    #[must_use]
    pub const fn is_read_only(&self) -> bool {
        matches!(self, Self::ReadOnly)
    }
}

/// Cache policy for resolved users.
///
/// The provider keeps resolved users in memory, keyed by username, to avoid
/// repeated round trips to the external store. Nothing invalidates an entry
/// when the external record changes; the policy only bounds how long or how
/// many entries are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CachePolicy {
    /// Keep every resolved user for the lifetime of the provider.
    #[default]
    Unbounded,

    /// Never cache (always query the external store).
    NoCache,

    /// Entries older than the lifespan are refetched.
    MaxLifespan {
        /// Maximum entry age in seconds.
        max_lifespan_secs: u64,
    },

    /// At most `max_entries` users are kept; the oldest entry is evicted first.
    MaxEntries {
        /// Maximum number of cached users.
        max_entries: usize,
    },
}

impl CachePolicy {
    /// Returns the maximum entry age, if the policy has one.
    #[must_use]
    pub const fn max_lifespan(&self) -> Option<Duration> {
        match self {
            Self::MaxLifespan { max_lifespan_secs } => {
                Some(Duration::from_secs(*max_lifespan_secs))
            }
            _ => None,
        }
    }

    /// Returns the maximum number of entries, if the policy has one.
    #[must_use]
    pub const fn max_entries(&self) -> Option<usize> {
        match self {
            Self::MaxEntries { max_entries } => Some(*max_entries),
            _ => None,
        }
    }

    /// Returns true if nothing should be cached.
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        matches!(self, Self::NoCache)
    }
}

/// Base configuration for all federation providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FederationConfig {
    /// Unique identifier for this provider configuration.
    pub id: Uuid,

    /// Realm this provider belongs to.
    pub realm_id: Uuid,

    /// Provider type (e.g., "external-database").
    pub provider_type: String,

    /// Display name.
    pub name: String,

    /// Priority for user lookup (lower = higher priority).
    pub priority: i32,

    /// Edit mode.
    pub edit_mode: EditMode,

    /// Cache policy.
    pub cache_policy: CachePolicy,

    /// Whether the provider is enabled.
    pub enabled: bool,

    /// Provider-specific configuration.
    pub config: HashMap<String, String>,

    /// Connection timeout.
    #[serde(with = "duration_secs")]
    pub connection_timeout: Duration,
}

impl FederationConfig {
    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> FederationConfigBuilder {
        FederationConfigBuilder::new()
    }

    /// Gets a config value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.config.get(key).map(String::as_str)
    }

    /// Gets a config value, treating blank values as missing.
    #[must_use]
    pub fn get_non_blank(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }
}

/// Builder for `FederationConfig`.
#[derive(Debug, Default)]
pub struct FederationConfigBuilder {
    id: Option<Uuid>,
    realm_id: Option<Uuid>,
    provider_type: Option<String>,
    name: Option<String>,
    priority: i32,
    edit_mode: EditMode,
    cache_policy: CachePolicy,
    enabled: bool,
    config: HashMap<String, String>,
    connection_timeout: Duration,
}

impl FederationConfigBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            enabled: true,
            connection_timeout: Duration::from_secs(5),
            ..Default::default()
        }
    }

    /// Sets the ID.
    #[must_use]
    pub const fn id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the realm ID.
    #[must_use]
    pub const fn realm_id(mut self, realm_id: Uuid) -> Self {
        self.realm_id = Some(realm_id);
        self
    }

    /// Sets the provider type.
    #[must_use]
    pub fn provider_type(mut self, provider_type: impl Into<String>) -> Self {
        self.provider_type = Some(provider_type.into());
        self
    }

    /// Sets the name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the edit mode.
    #[must_use]
    pub const fn edit_mode(mut self, mode: EditMode) -> Self {
        self.edit_mode = mode;
        self
    }

    /// Sets the cache policy.
    #[must_use]
    pub const fn cache_policy(mut self, policy: CachePolicy) -> Self {
        self.cache_policy = policy;
        self
    }

    /// Sets whether the provider is enabled.
    #[must_use]
    pub const fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Adds a config value.
    #[must_use]
    pub fn config(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }

    /// Sets the connection timeout.
    #[must_use]
    pub const fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the realm, provider type or name is missing.
    pub fn build(self) -> FederationResult<FederationConfig> {
        Ok(FederationConfig {
            id: self.id.unwrap_or_else(Uuid::now_v7),
            realm_id: self
                .realm_id
                .ok_or_else(|| FederationError::config("realm_id is required"))?,
            provider_type: self
                .provider_type
                .ok_or_else(|| FederationError::config("provider_type is required"))?,
            name: self
                .name
                .ok_or_else(|| FederationError::config("name is required"))?,
            priority: self.priority,
            edit_mode: self.edit_mode,
            cache_policy: self.cache_policy,
            enabled: self.enabled,
            config: self.config,
            connection_timeout: self.connection_timeout,
        })
    }
}

/// Serde support for Duration as whole seconds.
mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
