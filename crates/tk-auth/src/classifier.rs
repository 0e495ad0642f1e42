//! Structural token classification.
//!
//! Peeks at the unverified claims segment of a compact token to decide
//! which verifier a bearer credential should be routed to. The result
//! is advisory dispatch only and never a security boundary: the chosen
//! verifier still performs full cryptographic verification, and nothing
//! read here is trusted for authorization.

use crate::{AuthError, Result as AuthErrorResult};

use tk_core::ErrorLocation;

use std::panic::Location;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::Value;

/// Structural verdict for a bearer credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Carries an integer `id` and an `email` claim: shaped like a
    /// self-issued token.
    Local,
    /// Carries a provider session claim (`azp`/`sid`) or a bare `sub`:
    /// shaped like a provider-issued token.
    Remote,
    /// Decodable, but matches neither shape.
    Unrecognized,
}

/// Classify a raw bearer string without verifying it.
///
/// Fails with `MalformedCredential` when the string is not a
/// three-segment compact token with a decodable claims segment.
#[track_caller]
pub fn classify(token: &str) -> AuthErrorResult<TokenKind> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(AuthError::MalformedCredential {
            message: "expected a compact three-segment token".to_string(),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    let payload =
        URL_SAFE_NO_PAD
            .decode(segments[1])
            .map_err(|_| AuthError::MalformedCredential {
                message: "claims segment is not base64url".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

    let claims: Value = serde_json::from_slice(&payload).map_err(|_| {
        AuthError::MalformedCredential {
            message: "claims segment is not a JSON object".to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    })?;

    let has_local_id = claims
        .get("id")
        .is_some_and(|v| v.is_i64() || v.is_u64());
    let has_email = claims.get("email").is_some_and(Value::is_string);
    let has_session_claim = claims.get("azp").is_some() || claims.get("sid").is_some();
    let has_subject = claims.get("sub").is_some_and(Value::is_string);

    if has_local_id && has_email {
        Ok(TokenKind::Local)
    } else if has_session_claim || (has_subject && !has_local_id) {
        Ok(TokenKind::Remote)
    } else {
        Ok(TokenKind::Unrecognized)
    }
}
