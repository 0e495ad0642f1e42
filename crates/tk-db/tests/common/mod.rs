#![allow(dead_code)]

//! Shared fixtures for repository tests.

use tk_db::{NewTask, NewUser};

use sqlx::SqlitePool;

/// In-memory SQLite pool with migrations applied.
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePool::connect(":memory:")
        .await
        .expect("Failed to create test database");

    tk_db::MIGRATOR
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// A locally registered user (password, no remote subject).
pub fn local_user(email: &str) -> NewUser {
    NewUser {
        remote_id: None,
        email: email.to_string(),
        password_hash: Some("$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$hash".to_string()),
        display_name: Some("Local User".to_string()),
        avatar_url: None,
    }
}

/// A provider-provisioned user (remote subject, no password).
pub fn remote_user(remote_id: &str, email: &str) -> NewUser {
    NewUser {
        remote_id: Some(remote_id.to_string()),
        email: email.to_string(),
        password_hash: None,
        display_name: Some("Remote User".to_string()),
        avatar_url: Some("https://img.example.com/u.png".to_string()),
    }
}

pub fn simple_task(owner_id: i64, title: &str) -> NewTask {
    NewTask {
        owner_id,
        title: title.to_string(),
        description: None,
        deadline: None,
        is_urgent: false,
    }
}
