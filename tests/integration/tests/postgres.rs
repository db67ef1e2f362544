//! Provider against a real `PostgreSQL` user table.

use kc_federation::{
    CredentialInput, CredentialInputUpdater, CredentialInputValidator, UserLookupProvider,
    UserStorageProvider,
};
use kc_federation_sql::{
    ExternalDatabaseConfig, ExternalDatabaseStorageProvider, SqlUserDao, UserDao,
};

use crate::common::{PASSWORD, PostgresEnv, record};

/// Full provider lifecycle over a container database.
#[tokio::test]
#[ignore = "requires Docker"]
async fn test_postgres_provider_lifecycle() -> anyhow::Result<()> {
    let env = PostgresEnv::new().await?;
    env.insert(&record("bob", Some("bob@x.com"))).await?;
    env.insert(&record("carol", None)).await?;

    let federation_config = env.federation_config();
    let realm_id = federation_config.realm_id;
    let provider = ExternalDatabaseStorageProvider::connect(federation_config).await?;
    tracing::info!(provider = %provider.id(), "Connected to external database");

    let bob = provider
        .get_user_by_username(realm_id, "bob")
        .await?
        .expect("bob exists");
    assert_eq!(bob.email(), Some("bob@x.com"));

    let by_email = provider
        .get_user_by_email(realm_id, "bob@x.com")
        .await?
        .expect("bob by email");
    assert_eq!(by_email.username(), "bob");

    let carol = provider
        .get_user_by_id(realm_id, &format!("f:{}:carol", provider.id()))
        .await?
        .expect("carol by id");
    assert_eq!(carol.email(), None);

    assert!(provider.get_user_by_username(realm_id, "ghost").await?.is_none());

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
        .expect_err("read-only");
    assert!(err.is_read_only());

    provider.close().await?;
    provider.close().await?;

    Ok(())
}

/// Key values are bound, never spliced into the statement.
#[tokio::test]
#[ignore = "requires Docker"]
async fn test_lookup_key_is_bound_parameter() -> anyhow::Result<()> {
    let env = PostgresEnv::new().await?;
    env.insert(&record("bob", None)).await?;

    let config = ExternalDatabaseConfig::from_federation_config(&env.federation_config())?;
    let dao = SqlUserDao::connect(&config).await?;

    assert!(dao.find_by_username("bob' OR '1'='1").await?.is_none());
    assert!(dao.find_by_username("bob").await?.is_some());

    dao.release_connection().await?;
    let err = dao
        .find_by_username("bob")
        .await
        .expect_err("connection released");
    assert!(err.is_connection_error());

    // Releasing twice is harmless.
    dao.release_connection().await?;

    Ok(())
}
