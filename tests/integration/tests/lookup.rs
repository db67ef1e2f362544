//! Lookup and credential flows against an in-memory external store.

use kc_federation::{
    CachePolicy, CredentialInput, CredentialInputUpdater, CredentialInputValidator,
    CredentialType, StorageId, UserLookupProvider,
};
use uuid::Uuid;

use crate::common::{PASSWORD, memory_provider, record};

/// Resolves a user, authenticates and then fails to change the password.
#[tokio::test]
async fn test_login_flow_for_external_user() -> anyhow::Result<()> {
    let provider = memory_provider(
        CachePolicy::Unbounded,
        [record("bob", Some("bob@x.com"))],
    );
    let realm_id = Uuid::now_v7();

    let bob = provider
        .get_user_by_username(realm_id, "bob")
        .await?
        .expect("bob exists");
    assert_eq!(bob.username(), "bob");
    assert_eq!(bob.email(), Some("bob@x.com"));
    assert_eq!(bob.realm_id(), realm_id);
    assert_eq!(bob.federation_link(), provider.id().to_string());

    assert!(
        provider
            .is_valid(realm_id, &bob, &CredentialInput::password(PASSWORD))
            .await?
    );
    assert!(
        !provider
            .is_valid(realm_id, &bob, &CredentialInput::password("wrong-pw"))
            .await?
    );

    let err = provider
        .update_credential(realm_id, &bob, &CredentialInput::password("new-pw"))
        .await
        .expect_err("password updates are refused");
    assert!(err.is_read_only());

    // Nothing changed in the store.
    assert!(
        provider
            .is_valid(realm_id, &bob, &CredentialInput::password(PASSWORD))
            .await?
    );
    assert!(
        provider
            .get_disableable_credential_types(realm_id, &bob)
            .is_empty()
    );

    Ok(())
}

/// The id handed to the host resolves back to the same user.
#[tokio::test]
async fn test_user_id_round_trips_through_host() -> anyhow::Result<()> {
    let provider = memory_provider(CachePolicy::Unbounded, [record("alice", None)]);
    let realm_id = Uuid::now_v7();

    let alice = provider
        .get_user_by_username(realm_id, "alice")
        .await?
        .expect("alice exists");

    let storage_id = StorageId::parse(alice.id());
    assert!(storage_id.is_federated());
    assert_eq!(storage_id.external_id(), "alice");

    let by_id = provider
        .get_user_by_id(realm_id, alice.id())
        .await?
        .expect("lookup by id");
    assert_eq!(by_id, alice);
    assert_eq!(by_id.email(), None);

    Ok(())
}

/// Email lookups find users without touching the username cache.
#[tokio::test]
async fn test_email_lookup() -> anyhow::Result<()> {
    let provider = memory_provider(
        CachePolicy::Unbounded,
        [
            record("alice", Some("alice@example.com")),
            record("bob", Some("bob@example.com")),
        ],
    );
    let realm_id = Uuid::now_v7();

    let bob = provider
        .get_user_by_email(realm_id, "bob@example.com")
        .await?
        .expect("bob by email");
    assert_eq!(bob.username(), "bob");

    assert!(
        provider
            .get_user_by_email(realm_id, "carol@example.com")
            .await?
            .is_none()
    );
    assert!(provider.cache().is_empty());

    Ok(())
}

/// A user removed from the store stays visible until invalidated.
#[tokio::test]
async fn test_cached_user_survives_store_removal() -> anyhow::Result<()> {
    let provider = memory_provider(CachePolicy::Unbounded, [record("dave", None)]);
    let realm_id = Uuid::now_v7();

    provider.get_user_by_username(realm_id, "dave").await?;
    provider.dao().remove("dave");

    let cached = provider.get_user_by_username(realm_id, "dave").await?;
    assert!(cached.is_some());

    // Credential checks always read the store.
    let dave = cached.expect("cached dave");
    assert!(
        !provider
            .is_valid(realm_id, &dave, &CredentialInput::password(PASSWORD))
            .await?
    );

    provider.invalidate_user("dave");
    assert!(provider.get_user_by_username(realm_id, "dave").await?.is_none());

    Ok(())
}

/// Non-password credential types are neither validated nor updated.
#[tokio::test]
async fn test_other_credential_types_are_ignored() -> anyhow::Result<()> {
    let provider = memory_provider(CachePolicy::NoCache, [record("erin", None)]);
    let realm_id = Uuid::now_v7();
    let erin = provider
        .get_user_by_username(realm_id, "erin")
        .await?
        .expect("erin exists");

    for credential_type in [
        CredentialType::Totp,
        CredentialType::Hotp,
        CredentialType::Webauthn,
        CredentialType::RecoveryCodes,
    ] {
        let input = CredentialInput::user_credential(credential_type, PASSWORD);
        assert!(!provider.is_configured_for(realm_id, &erin, credential_type));
        assert!(!provider.is_valid(realm_id, &erin, &input).await?);
        assert!(!provider.update_credential(realm_id, &erin, &input).await?);
        provider
            .disable_credential_type(realm_id, &erin, credential_type)
            .await?;
    }

    Ok(())
}
