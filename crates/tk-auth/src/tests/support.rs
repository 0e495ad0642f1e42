#![allow(dead_code)]

//! Shared helpers for the authentication core's tests.

use crate::{AuthError, ProviderDirectory, ProviderProfile, Result as AuthErrorResult};

use tk_core::ErrorLocation;
use tk_db::{NewUser, UserRepository};

use std::collections::HashMap;
use std::panic::Location;

use async_trait::async_trait;
use sqlx::SqlitePool;

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

pub async fn seed_local_user(pool: &SqlitePool, email: &str) -> i64 {
    let users = UserRepository::new(pool.clone());
    users
        .create(&NewUser {
            remote_id: None,
            email: email.to_string(),
            password_hash: Some("$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$hash".to_string()),
            display_name: Some("Local User".to_string()),
            avatar_url: None,
        })
        .await
        .expect("Failed to seed local user")
        .id
}

pub async fn seed_remote_user(pool: &SqlitePool, remote_id: &str, email: &str) -> i64 {
    let users = UserRepository::new(pool.clone());
    users
        .create(&NewUser {
            remote_id: Some(remote_id.to_string()),
            email: email.to_string(),
            password_hash: None,
            display_name: Some("Remote User".to_string()),
            avatar_url: None,
        })
        .await
        .expect("Failed to seed remote user")
        .id
}

/// In-memory provider directory double.
#[derive(Default)]
pub struct StaticDirectory {
    profiles: HashMap<String, ProviderProfile>,
}

impl StaticDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(mut self, subject: &str, email: &str) -> Self {
        self.profiles.insert(
            subject.to_string(),
            ProviderProfile {
                primary_email: email.to_lowercase(),
                display_name: Some("Directory User".to_string()),
                avatar_url: None,
            },
        );
        self
    }
}

#[async_trait]
impl ProviderDirectory for StaticDirectory {
    async fn fetch_profile(&self, subject: &str) -> AuthErrorResult<ProviderProfile> {
        self.profiles.get(subject).cloned().ok_or_else(|| {
            AuthError::ProviderUnreachable {
                message: format!("unknown subject {}", subject),
                location: ErrorLocation::from(Location::caller()),
            }
        })
    }
}
