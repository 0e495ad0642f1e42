//! Axum extractor running dual-credential authentication.

use crate::api::error::ApiError;
use crate::app_state::AppState;

use tk_auth::AuthenticatedIdentity;

use std::future::Future;

use axum::{extract::FromRequestParts, http::request::Parts};

/// Authenticated identity for the current request.
///
/// Handlers taking this parameter only run after the bearer credential
/// was classified, cryptographically verified, and reconciled to a
/// local user. The raw credential never reaches a handler, and there is
/// no partially populated form: the inner value exists if and only if
/// one verification path fully succeeded.
pub struct Identity(pub AuthenticatedIdentity);

impl FromRequestParts<AppState> for Identity {
    type Rejection = ApiError;

    #[allow(clippy::manual_async_fn)]
    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            let header = parts
                .headers
                .get(axum::http::header::AUTHORIZATION)
                .and_then(|h| h.to_str().ok())
                .ok_or_else(|| {
                    log::debug!("Missing Authorization header");
                    ApiError::unauthorized()
                })?;

            let token = header.strip_prefix("Bearer ").ok_or_else(|| {
                log::debug!("Invalid authorization scheme: expected 'Bearer'");
                ApiError::unauthorized()
            })?;

            let identity = state.authenticator.authenticate(token).await?;

            log::debug!(
                "Authenticated user {} via {}",
                identity.user_id,
                identity.method.as_str()
            );

            Ok(Identity(identity))
        }
    }
}
