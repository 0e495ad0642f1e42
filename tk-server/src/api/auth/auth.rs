//! Local registration and sign-in handlers.

use crate::api::auth::auth_response::AuthResponse;
use crate::api::auth::login_request::LoginRequest;
use crate::api::auth::register_request::RegisterRequest;
use crate::api::error::{ApiError, Result as ApiResult};
use crate::api::extractors::identity::Identity;
use crate::app_state::AppState;

use tk_auth::{hash_password, verify_password, LocalTokenAuthority};
use tk_core::ErrorLocation;
use tk_db::{NewUser, UserRepository};

use std::panic::Location;
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

// =============================================================================
// Handlers
// =============================================================================

/// POST /api/auth/register
///
/// Create a password-backed local account and issue a token for it.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let authority = local_authority(&state)?;

    let email = req.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::Validation {
            message: "A valid email is required".to_string(),
            field: Some("email".to_string()),
            location: ErrorLocation::from(Location::caller()),
        });
    }
    if req.password.len() < 8 {
        return Err(ApiError::Validation {
            message: "Password must be at least 8 characters".to_string(),
            field: Some("password".to_string()),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    let users = UserRepository::new(state.pool.clone());
    if users.find_by_email(&email).await?.is_some() {
        return Err(email_taken());
    }

    let password_hash = hash_password(&req.password)?;
    let display_name = req
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string);

    let new_user = NewUser {
        remote_id: None,
        email,
        password_hash: Some(password_hash),
        display_name,
        avatar_url: None,
    };
    let user = match users.create(&new_user).await {
        Ok(user) => user,
        // Two concurrent registrations: the unique index picked a winner.
        Err(e) if e.is_unique_violation() => return Err(email_taken()),
        Err(e) => return Err(e.into()),
    };

    log::info!("Registered local user {}", user.id);

    let token = authority.issue(&user)?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}

/// POST /api/auth/login
///
/// Verify a password and issue a token. Unknown email, wrong password,
/// and provider-only accounts are rejected identically so the endpoint
/// cannot be used to enumerate accounts.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let authority = local_authority(&state)?;

    let email = req.email.trim().to_lowercase();
    let users = UserRepository::new(state.pool.clone());

    let Some(user) = users.find_by_email(&email).await? else {
        return Err(ApiError::unauthorized());
    };
    let Some(ref stored_hash) = user.password_hash else {
        return Err(ApiError::unauthorized());
    };
    if !verify_password(stored_hash, &req.password) {
        return Err(ApiError::unauthorized());
    }

    log::info!("User {} signed in locally", user.id);

    let token = authority.issue(&user)?;
    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// Response for GET /api/auth/me
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: i64,
    pub email: String,
    pub name: Option<String>,
    pub auth_method: String,
}

/// GET /api/auth/me
///
/// Echo the authenticated identity, whichever path produced it.
pub async fn me(Identity(identity): Identity) -> Json<MeResponse> {
    Json(MeResponse {
        id: identity.user_id,
        email: identity.email,
        name: identity.display_name,
        auth_method: identity.method.as_str().to_string(),
    })
}

// =============================================================================
// Helpers
// =============================================================================

#[track_caller]
fn local_authority(state: &AppState) -> ApiResult<Arc<LocalTokenAuthority>> {
    state
        .local_authority
        .clone()
        .ok_or_else(|| ApiError::ServiceUnavailable {
            message: "Local sign-in is not enabled on this deployment".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
}

#[track_caller]
fn email_taken() -> ApiError {
    ApiError::Conflict {
        message: "This email is already registered".to_string(),
        location: ErrorLocation::from(Location::caller()),
    }
}
