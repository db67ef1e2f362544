//! Concurrent use of one provider.

use std::sync::Arc;

use kc_federation::{
    CachePolicy, CredentialInput, CredentialInputValidator, UserLookupProvider,
};
use uuid::Uuid;

use crate::common::{PASSWORD, memory_provider, record};

const USERS: usize = 32;
const TASKS: usize = 8;

/// Parallel lookups always return a view of the requested user.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_lookups_return_requested_user() -> anyhow::Result<()> {
    let users = (0..USERS).map(|i| record(&format!("user-{i}"), None));
    let provider = Arc::new(memory_provider(CachePolicy::Unbounded, users));
    let realm_id = Uuid::now_v7();

    let handles: Vec<_> = (0..TASKS)
        .map(|task| {
            let provider = Arc::clone(&provider);
            tokio::spawn(async move {
                for round in 0..USERS {
                    let username = format!("user-{}", (task + round) % USERS);
                    let view = provider
                        .get_user_by_username(realm_id, &username)
                        .await?
                        .ok_or_else(|| anyhow::anyhow!("{username} not found"))?;
                    anyhow::ensure!(view.username() == username, "wrong user for {username}");

                    let valid = provider
                        .is_valid(realm_id, &view, &CredentialInput::password(PASSWORD))
                        .await?;
                    anyhow::ensure!(valid, "password rejected for {username}");
                }
                anyhow::Ok(())
            })
        })
        .collect();

    for handle in handles {
        handle.await??;
    }

    assert_eq!(provider.cache().len(), USERS);
    Ok(())
}

/// Concurrent inserts keep a bounded cache within its bound.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_bounded_cache_under_load() -> anyhow::Result<()> {
    let users = (0..USERS).map(|i| record(&format!("user-{i}"), None));
    let provider = Arc::new(memory_provider(
        CachePolicy::MaxEntries { max_entries: 8 },
        users,
    ));
    let realm_id = Uuid::now_v7();

    let handles: Vec<_> = (0..TASKS)
        .map(|task| {
            let provider = Arc::clone(&provider);
            tokio::spawn(async move {
                for round in 0..USERS {
                    let username = format!("user-{}", (task * 3 + round) % USERS);
                    provider.get_user_by_username(realm_id, &username).await?;
                }
                anyhow::Ok(())
            })
        })
        .collect();

    for handle in handles {
        handle.await??;
    }

    assert!(provider.cache().len() <= 8);
    Ok(())
}
