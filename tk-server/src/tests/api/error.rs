use crate::api::error::ApiError;

use tk_auth::AuthError;
use tk_core::ErrorLocation;

use std::panic::Location;

use axum::http::StatusCode;
use axum::response::IntoResponse;

fn located() -> ErrorLocation {
    ErrorLocation::from(Location::caller())
}

#[test]
fn given_authentication_failures_when_mapped_then_all_collapse_to_unauthorized() {
    let variants = vec![
        AuthError::MalformedCredential {
            message: "x".to_string(),
            location: located(),
        },
        AuthError::InvalidSignature { location: located() },
        AuthError::Expired { location: located() },
        AuthError::UserMismatch {
            message: "x".to_string(),
            location: located(),
        },
        AuthError::NoSubject { location: located() },
        AuthError::AccountNotProvisioned {
            subject: "usr_1".to_string(),
            location: located(),
        },
        AuthError::CapabilityUnavailable {
            capability: "local",
            location: located(),
        },
        AuthError::ProviderUnreachable {
            message: "timeout".to_string(),
            location: located(),
        },
    ];

    for variant in variants {
        let api: ApiError = variant.into();
        let response = api.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

#[test]
fn given_email_collision_when_mapped_then_conflict_with_guidance() {
    let api: ApiError = AuthError::EmailAlreadyRegisteredLocally {
        email: "alice@example.com".to_string(),
        location: located(),
    }
    .into();

    assert!(matches!(api, ApiError::Conflict { .. }));
    let response = api.into_response();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[test]
fn given_internal_auth_failure_when_mapped_then_internal_error() {
    let api: ApiError = AuthError::Internal {
        message: "boom".to_string(),
        location: located(),
    }
    .into();

    let response = api.into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
