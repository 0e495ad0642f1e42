//! Dual-credential authentication entry point.

use crate::classifier::{classify, TokenKind};
use crate::{
    AuthenticatedIdentity, AuthError, IdentityReconciler, LocalTokenAuthority,
    RemoteTokenVerifier, Result as AuthErrorResult,
};

use tk_core::{AuthMethod, ErrorLocation};
use tk_db::UserRepository;

use std::panic::Location;
use std::sync::Arc;

/// Classifies a bearer credential, runs the matching verifier, and
/// resolves the result to a normalized identity.
///
/// Either capability may be absent when its secret or key material was
/// not supplied at startup; a credential routed to an absent capability
/// fails closed instead of crashing or falling through to the other
/// path.
pub struct DualAuthenticator {
    local: Option<Arc<LocalTokenAuthority>>,
    remote: Option<Arc<RemoteTokenVerifier>>,
    users: UserRepository,
    reconciler: IdentityReconciler,
}

impl DualAuthenticator {
    pub fn new(
        local: Option<Arc<LocalTokenAuthority>>,
        remote: Option<Arc<RemoteTokenVerifier>>,
        users: UserRepository,
        reconciler: IdentityReconciler,
    ) -> Self {
        Self {
            local,
            remote,
            users,
            reconciler,
        }
    }

    /// Authenticate one bearer token.
    ///
    /// Every failure is terminal for this credential; callers re-attempt
    /// only with a fresh one. There is no fallback from one verification
    /// path to the other: the classifier's verdict is final for routing,
    /// and the routed verifier's verdict is final for the request.
    pub async fn authenticate(&self, token: &str) -> AuthErrorResult<AuthenticatedIdentity> {
        match classify(token)? {
            TokenKind::Local => self.authenticate_local(token).await,
            TokenKind::Remote => self.authenticate_remote(token).await,
            TokenKind::Unrecognized => Err(AuthError::MalformedCredential {
                message: "unrecognized claims shape".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }

    async fn authenticate_local(&self, token: &str) -> AuthErrorResult<AuthenticatedIdentity> {
        let authority =
            self.local
                .as_ref()
                .ok_or_else(|| AuthError::CapabilityUnavailable {
                    capability: "local",
                    location: ErrorLocation::from(Location::caller()),
                })?;

        let claims = authority.verify(token)?;

        let user = self
            .users
            .find_by_id(claims.id)
            .await?
            .ok_or_else(|| AuthError::UserMismatch {
                message: format!("no user for claim id {}", claims.id),
                location: ErrorLocation::from(Location::caller()),
            })?;

        // A remote-only user must never authenticate through a
        // local-shaped token, even one that passes the signature check.
        if !user.has_password() {
            return Err(AuthError::UserMismatch {
                message: "user has no local password credential".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(AuthenticatedIdentity::from_user(&user, AuthMethod::Local))
    }

    async fn authenticate_remote(&self, token: &str) -> AuthErrorResult<AuthenticatedIdentity> {
        let verifier = self
            .remote
            .as_ref()
            .ok_or_else(|| AuthError::CapabilityUnavailable {
                capability: "remote",
                location: ErrorLocation::from(Location::caller()),
            })?;

        let claims = verifier.verify(token)?;
        self.reconciler.resolve(&claims.sub).await
    }
}
