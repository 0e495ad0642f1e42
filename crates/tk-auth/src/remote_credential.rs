//! Remote credential verification.

use crate::{AuthError, RemoteClaims, Result as AuthErrorResult};

use tk_core::ErrorLocation;

use std::panic::Location;

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

/// Clock drift tolerated between this service and the identity
/// provider's token-minting infrastructure.
pub const REMOTE_CLOCK_SKEW_SECS: u64 = 300;

/// Verifies provider-issued tokens against the provider's public
/// verification material. Never creates or mutates users; resolving a
/// subject to a local record is the reconciler's job, which keeps
/// verification and provisioning independently testable.
pub struct RemoteTokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl RemoteTokenVerifier {
    /// RS256 against the provider's public key. Fails at construction
    /// on unusable key material, so a misconfigured deployment refuses
    /// the remote path up front.
    #[track_caller]
    pub fn from_rsa_pem(public_key_pem: &str) -> AuthErrorResult<Self> {
        let decoding_key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes()).map_err(|e| {
            AuthError::Internal {
                message: format!("Invalid provider public key: {}", e),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_exp = true;
        validation.leeway = REMOTE_CLOCK_SKEW_SECS;

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    /// Verify and extract the provider's stable subject id.
    #[track_caller]
    pub fn verify(&self, token: &str) -> AuthErrorResult<RemoteClaims> {
        let token_data =
            decode::<RemoteClaims>(token, &self.decoding_key, &self.validation).map_err(|e| {
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

        if token_data.claims.sub.is_empty() {
            return Err(AuthError::NoSubject {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(token_data.claims)
    }
}
