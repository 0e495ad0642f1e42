use super::support::{create_test_pool, seed_local_user, seed_remote_user, StaticDirectory};

use crate::{AuthError, IdentityReconciler, ProvisioningPolicy};

use tk_core::AuthMethod;
use tk_db::{NewUser, UserRepository};

use std::sync::Arc;

#[tokio::test]
async fn given_known_subject_when_resolved_then_fast_path_returns_identity() {
    let pool = create_test_pool().await;
    let user_id = seed_remote_user(&pool, "usr_123", "bob@example.com").await;

    let reconciler = IdentityReconciler::new(
        UserRepository::new(pool.clone()),
        Arc::new(StaticDirectory::new()),
        ProvisioningPolicy::FailClosed,
    );

    let identity = reconciler.resolve("usr_123").await.unwrap();

    assert_eq!(identity.user_id, user_id);
    assert_eq!(identity.email, "bob@example.com");
    assert_eq!(identity.method, AuthMethod::Remote);
}

#[tokio::test]
async fn given_unknown_subject_under_fail_closed_when_resolved_then_not_provisioned() {
    let pool = create_test_pool().await;

    let reconciler = IdentityReconciler::new(
        UserRepository::new(pool.clone()),
        Arc::new(StaticDirectory::new().with_profile("usr_999", "new@example.com")),
        ProvisioningPolicy::FailClosed,
    );

    let result = reconciler.resolve("usr_999").await;

    assert!(matches!(
        result,
        Err(AuthError::AccountNotProvisioned { .. })
    ));
}

#[tokio::test]
async fn given_unknown_subject_under_lazy_when_resolved_then_user_is_provisioned_once() {
    let pool = create_test_pool().await;

    let reconciler = IdentityReconciler::new(
        UserRepository::new(pool.clone()),
        Arc::new(StaticDirectory::new().with_profile("usr_999", "New@Example.com")),
        ProvisioningPolicy::Lazy,
    );

    let first = reconciler.resolve("usr_999").await.unwrap();
    let second = reconciler.resolve("usr_999").await.unwrap();

    // Repeated sight never creates a second record.
    assert_eq!(first.user_id, second.user_id);
    assert_eq!(first.email, "new@example.com");

    let users = UserRepository::new(pool.clone());
    let provisioned = users.find_by_remote_id("usr_999").await.unwrap().unwrap();
    assert_eq!(provisioned.id, first.user_id);
    assert!(provisioned.password_hash.is_none());
}

#[tokio::test]
async fn given_email_owned_by_password_account_when_lazily_provisioned_then_rejected() {
    let pool = create_test_pool().await;
    seed_local_user(&pool, "alice@example.com").await;

    let reconciler = IdentityReconciler::new(
        UserRepository::new(pool.clone()),
        Arc::new(StaticDirectory::new().with_profile("usr_999", "alice@example.com")),
        ProvisioningPolicy::Lazy,
    );

    let result = reconciler.resolve("usr_999").await;

    assert!(matches!(
        result,
        Err(AuthError::EmailAlreadyRegisteredLocally { .. })
    ));

    // The password account is untouched.
    let users = UserRepository::new(pool.clone());
    let existing = users.find_by_email("alice@example.com").await.unwrap().unwrap();
    assert!(existing.remote_id.is_none());
    assert!(existing.password_hash.is_some());
}

#[tokio::test]
async fn given_email_bound_to_other_subject_when_lazily_provisioned_then_rejected() {
    let pool = create_test_pool().await;
    seed_remote_user(&pool, "usr_111", "shared@example.com").await;

    let reconciler = IdentityReconciler::new(
        UserRepository::new(pool.clone()),
        Arc::new(StaticDirectory::new().with_profile("usr_222", "shared@example.com")),
        ProvisioningPolicy::Lazy,
    );

    let result = reconciler.resolve("usr_222").await;

    assert!(matches!(
        result,
        Err(AuthError::EmailAlreadyRegisteredLocally { .. })
    ));
}

#[tokio::test]
async fn given_partially_provisioned_record_when_lazily_resolved_then_subject_is_attached() {
    let pool = create_test_pool().await;
    let users = UserRepository::new(pool.clone());
    let partial = users
        .create(&NewUser {
            remote_id: None,
            email: "carol@example.com".to_string(),
            password_hash: None,
            display_name: None,
            avatar_url: None,
        })
        .await
        .unwrap();

    let reconciler = IdentityReconciler::new(
        UserRepository::new(pool.clone()),
        Arc::new(StaticDirectory::new().with_profile("usr_456", "carol@example.com")),
        ProvisioningPolicy::Lazy,
    );

    let identity = reconciler.resolve("usr_456").await.unwrap();

    assert_eq!(identity.user_id, partial.id);
    let completed = users.find_by_remote_id("usr_456").await.unwrap().unwrap();
    assert_eq!(completed.id, partial.id);
}

#[tokio::test]
async fn given_directory_failure_under_lazy_when_resolved_then_error_propagates() {
    let pool = create_test_pool().await;

    let reconciler = IdentityReconciler::new(
        UserRepository::new(pool.clone()),
        Arc::new(StaticDirectory::new()),
        ProvisioningPolicy::Lazy,
    );

    let result = reconciler.resolve("usr_unknown").await;

    assert!(matches!(result, Err(AuthError::ProviderUnreachable { .. })));
}
