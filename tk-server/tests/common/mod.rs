#![allow(dead_code)]

//! Test infrastructure for tk-server API tests

pub mod jwt_helper;

use tk_auth::{
    AuthError, DualAuthenticator, IdentityReconciler, LifecycleEventProcessor,
    LocalTokenAuthority, ProviderDirectory, ProviderProfile, ProvisioningPolicy,
    RemoteTokenVerifier, WebhookSignatureVerifier,
};
use tk_core::ErrorLocation;
use tk_db::UserRepository;
use tk_server::AppState;

use std::collections::HashMap;
use std::panic::Location;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::response::Response;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use http_body_util::BodyExt;
use sha2::Sha256;
use sqlx::SqlitePool;

pub const JWT_SECRET: &[u8] = b"test-secret-key-at-least-32-bytes";
pub const WEBHOOK_KEY: &[u8] = b"test-webhook-secret-key";

/// Create a test pool with in-memory SQLite
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

/// AppState with every capability enabled and a fail-closed reconciler.
pub async fn create_test_app_state() -> AppState {
    let pool = create_test_pool().await;
    build_state(
        pool,
        ProvisioningPolicy::FailClosed,
        Arc::new(StaticDirectory::new()),
    )
}

/// AppState with an explicit policy and provider directory double.
pub async fn create_test_app_state_with(
    policy: ProvisioningPolicy,
    directory: Arc<dyn ProviderDirectory>,
) -> AppState {
    let pool = create_test_pool().await;
    build_state(pool, policy, directory)
}

pub fn build_state(
    pool: SqlitePool,
    policy: ProvisioningPolicy,
    directory: Arc<dyn ProviderDirectory>,
) -> AppState {
    let local = Arc::new(LocalTokenAuthority::new(JWT_SECRET, 3600));
    let remote =
        Arc::new(RemoteTokenVerifier::from_rsa_pem(jwt_helper::TEST_PUBLIC_KEY).unwrap());
    let webhook = Arc::new(WebhookSignatureVerifier::new(&webhook_secret()).unwrap());

    let reconciler = IdentityReconciler::new(UserRepository::new(pool.clone()), directory, policy);
    let authenticator = Arc::new(DualAuthenticator::new(
        Some(local.clone()),
        Some(remote.clone()),
        UserRepository::new(pool.clone()),
        reconciler,
    ));

    AppState {
        pool: pool.clone(),
        local_authority: Some(local),
        remote_verifier: Some(remote),
        authenticator,
        webhook_verifier: Some(webhook),
        lifecycle: Arc::new(LifecycleEventProcessor::new(pool)),
    }
}

pub fn webhook_secret() -> String {
    format!("whsec_{}", STANDARD.encode(WEBHOOK_KEY))
}

/// Svix-style signature over the exact body bytes.
pub fn sign_webhook(message_id: &str, timestamp: &str, body: &[u8]) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(WEBHOOK_KEY).unwrap();
    mac.update(message_id.as_bytes());
    mac.update(b".");
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(body);
    format!("v1,{}", STANDARD.encode(mac.finalize().into_bytes()))
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// In-memory provider directory double for lazy-provisioning tests.
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
    async fn fetch_profile(
        &self,
        subject: &str,
    ) -> std::result::Result<ProviderProfile, AuthError> {
        self.profiles.get(subject).cloned().ok_or_else(|| {
            AuthError::ProviderUnreachable {
                message: format!("unknown subject {}", subject),
                location: ErrorLocation::from(Location::caller()),
            }
        })
    }
}
