//! Identity-provider directory access.
//!
//! The lazy-provisioning path needs the provider's current profile for
//! a subject it has never seen. That capability sits behind a trait so
//! the reconciler can be exercised without network access.

use crate::{AuthError, Result as AuthErrorResult};

use tk_core::ErrorLocation;

use std::panic::Location;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

/// Profile data for a remote subject, as reported by the provider.
#[derive(Debug, Clone)]
pub struct ProviderProfile {
    /// Primary verified email, lower-cased.
    pub primary_email: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// Read-only directory capability of the identity provider.
#[async_trait]
pub trait ProviderDirectory: Send + Sync {
    async fn fetch_profile(&self, subject: &str) -> AuthErrorResult<ProviderProfile>;
}

/// REST client for the provider's user directory.
///
/// Calls are independent per request and bounded by a client timeout;
/// a timeout surfaces as `ProviderUnreachable`, which the API boundary
/// collapses into the same opaque unauthorized response as any other
/// verification failure.
pub struct HttpProviderDirectory {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct DirectoryEmail {
    id: String,
    email_address: String,
}

#[derive(Debug, Deserialize)]
struct DirectoryUser {
    #[serde(default)]
    email_addresses: Vec<DirectoryEmail>,
    #[serde(default)]
    primary_email_address_id: Option<String>,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
}

impl HttpProviderDirectory {
    #[track_caller]
    pub fn new(base_url: &str, api_key: &str) -> AuthErrorResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| AuthError::Internal {
                message: format!("Failed to build directory client: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl ProviderDirectory for HttpProviderDirectory {
    async fn fetch_profile(&self, subject: &str) -> AuthErrorResult<ProviderProfile> {
        let url = format!("{}/v1/users/{}", self.base_url, subject);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| AuthError::ProviderUnreachable {
                message: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        if !response.status().is_success() {
            return Err(AuthError::ProviderUnreachable {
                message: format!("directory returned {}", response.status()),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let user: DirectoryUser =
            response
                .json()
                .await
                .map_err(|e| AuthError::ProviderUnreachable {
                    message: format!("directory payload unreadable: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?;

        let primary_id =
            user.primary_email_address_id
                .as_deref()
                .ok_or_else(|| AuthError::UserMismatch {
                    message: format!("provider account {} has no primary email", subject),
                    location: ErrorLocation::from(Location::caller()),
                })?;

        let email = user
            .email_addresses
            .iter()
            .find(|e| e.id == primary_id)
            .ok_or_else(|| AuthError::UserMismatch {
                message: format!("provider account {} has no primary email", subject),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(ProviderProfile {
            primary_email: email.email_address.to_lowercase(),
            display_name: join_display_name(user.first_name.as_deref(), user.last_name.as_deref()),
            avatar_url: user.image_url,
        })
    }
}

/// `"First Last"`, `"First"`, or nothing at all when the provider has
/// no first name on file.
pub(crate) fn join_display_name(first: Option<&str>, last: Option<&str>) -> Option<String> {
    first.map(|f| match last {
        Some(l) => format!("{} {}", f, l).trim().to_string(),
        None => f.to_string(),
    })
}
