//! Local credential authority.

use crate::{AuthError, LocalClaims, Result as AuthErrorResult};

use tk_core::{ErrorLocation, User};

use std::panic::Location;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

/// Issues and verifies the service's own symmetric tokens.
///
/// Construction requires the signing secret: a deployment without one
/// has no local authority at all, and the server refuses the local path
/// instead of discovering a missing secret per request.
pub struct LocalTokenAuthority {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_ttl_secs: i64,
}

impl LocalTokenAuthority {
    /// HS256 only; the algorithm is pinned and never negotiated from
    /// the token header.
    pub fn new(secret: &[u8], token_ttl_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 30; // 30 second clock skew tolerance

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            token_ttl_secs,
        }
    }

    /// Issue a bearer token for a locally registered user.
    #[track_caller]
    pub fn issue(&self, user: &User) -> AuthErrorResult<String> {
        let now = chrono::Utc::now().timestamp();
        let claims = LocalClaims {
            id: user.id,
            email: user.email.clone(),
            iat: now,
            exp: now + self.token_ttl_secs,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            AuthError::Internal {
                message: format!("Failed to encode token: {}", e),
                location: ErrorLocation::from(Location::caller()),
            }
        })
    }

    /// Verify signature and expiry, returning the embedded claims.
    ///
    /// The caller still has to resolve the claims against the user
    /// store; a valid signature alone authenticates nobody.
    #[track_caller]
    pub fn verify(&self, token: &str) -> AuthErrorResult<LocalClaims> {
        let token_data =
            decode::<LocalClaims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                use jsonwebtoken::errors::ErrorKind;
                match e.kind() {
                    ErrorKind::ExpiredSignature => AuthError::Expired {
                        location: ErrorLocation::from(Location::caller()),
                    },
                    ErrorKind::InvalidSignature => AuthError::InvalidSignature {
                        location: ErrorLocation::from(Location::caller()),
                    },
                    _ => AuthError::MalformedCredential {
                        message: format!("JWT decode failed: {}", e),
                        location: ErrorLocation::from(Location::caller()),
                    },
                }
            })?;

        Ok(token_data.claims)
    }
}
