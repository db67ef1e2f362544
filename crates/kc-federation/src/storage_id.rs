//! Storage ids for federated users.
//!
//! The host hands federated users ids of the form
//! `f:<provider-id>:<external-id>`. Providers only care about the external
//! id; the provider id belongs to the host.

use std::fmt;

/// Marker that starts a host-issued federated id.
const FEDERATED_MARKER: &str = "f:";

/// A parsed user id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageId<'a> {
    provider_id: Option<&'a str>,
    external_id: &'a str,
}

impl<'a> StorageId<'a> {
    /// Parses a user id.
    ///
    /// - `f:<provider-id>:<external-id>` yields both parts.
    /// - `<prefix>:<external-id>` yields the part after the first `:`.
    /// - An id without `:` is its own external id.
    ///
    /// The external id may itself contain `:`.
    #[must_use]
    pub fn parse(id: &'a str) -> Self {
        let rest = id.strip_prefix(FEDERATED_MARKER).unwrap_or(id);
        match rest.split_once(':') {
            Some((provider_id, external_id)) => Self {
                provider_id: Some(provider_id),
                external_id,
            },
            None => Self {
                provider_id: None,
                external_id: rest,
            },
        }
    }

    /// Returns the provider id or prefix, if present.
    #[must_use]
    pub const fn provider_id(&self) -> Option<&'a str> {
        self.provider_id
    }

    /// Returns the id of the user inside the external store.
    #[must_use]
    pub const fn external_id(&self) -> &'a str {
        self.external_id
    }

    /// Returns true if the id carries a provider id or prefix.
    #[must_use]
    pub const fn is_federated(&self) -> bool {
        self.provider_id.is_some()
    }

    /// Builds the host id for a user of the given provider.
    #[must_use]
    pub fn federated(provider_id: &str, external_id: &str) -> String {
        format!("{FEDERATED_MARKER}{provider_id}:{external_id}")
    }
}

impl fmt::Display for StorageId<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.provider_id {
            Some(provider_id) => write!(f, "{FEDERATED_MARKER}{provider_id}:{}", self.external_id),
            None => f.write_str(self.external_id),
        }
    }
}
