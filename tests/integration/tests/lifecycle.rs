//! Provider disposal.

use kc_federation::{CachePolicy, FederationError, UserLookupProvider, UserStorageProvider};
use uuid::Uuid;

use crate::common::{memory_provider, record};

/// Closing releases the store exactly once and later lookups fail.
#[tokio::test]
async fn test_close_releases_connection_once() -> anyhow::Result<()> {
    let provider = memory_provider(CachePolicy::Unbounded, [record("alice", None)]);
    let realm_id = Uuid::now_v7();

    provider.get_user_by_username(realm_id, "alice").await?;
    assert_eq!(provider.provider_type(), "external-database");

    provider.close().await?;
    provider.close().await?;

    assert!(provider.is_closed());
    assert_eq!(provider.dao().releases(), 1);
    assert!(provider.cache().is_empty());

    let err = provider
        .get_user_by_username(realm_id, "alice")
        .await
        .expect_err("store is released");
    assert!(err.is_connection_error());

    Ok(())
}

/// A failed release is reported to the host.
#[tokio::test]
async fn test_close_failure_is_reported() {
    let provider = memory_provider(CachePolicy::Unbounded, []);
    provider.dao().fail_release(true);

    let err = provider.close().await.expect_err("release fails");
    assert!(matches!(err, FederationError::ResourceRelease(_)));
    assert!(provider.is_closed());
}
