//! Remote-subject reconciliation.
//!
//! Maps a cryptographically verified provider subject to exactly one
//! local user record. The fast path is a lookup; what happens on a miss
//! is a deployment-level policy fixed at construction, so outcomes are
//! deterministic for the same input.

use crate::provider::ProviderDirectory;
use crate::{AuthenticatedIdentity, AuthError, Result as AuthErrorResult};

use tk_core::{AuthMethod, ErrorLocation, User};
use tk_db::{NewUser, UserRepository};

use std::panic::Location;
use std::sync::Arc;

/// How a verified subject with no local record is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisioningPolicy {
    /// Only the lifecycle event processor creates users; an unknown
    /// subject on the interactive path is rejected. Avoids interactive
    /// requests racing the canonical provider event.
    FailClosed,
    /// Fetch the provider profile and provision inline on first sight.
    Lazy,
}

impl ProvisioningPolicy {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "fail_closed" => Some(Self::FailClosed),
            "lazy" => Some(Self::Lazy),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::FailClosed => "fail_closed",
            Self::Lazy => "lazy",
        }
    }
}

pub struct IdentityReconciler {
    users: UserRepository,
    directory: Arc<dyn ProviderDirectory>,
    policy: ProvisioningPolicy,
}

impl IdentityReconciler {
    pub fn new(
        users: UserRepository,
        directory: Arc<dyn ProviderDirectory>,
        policy: ProvisioningPolicy,
    ) -> Self {
        Self {
            users,
            directory,
            policy,
        }
    }

    /// Resolve a verified subject to a local identity, provisioning
    /// when the active policy allows it. Never creates a duplicate:
    /// repeated calls for the same subject yield the same user id.
    pub async fn resolve(&self, subject: &str) -> AuthErrorResult<AuthenticatedIdentity> {
        if let Some(user) = self.users.find_by_remote_id(subject).await? {
            return Ok(identity_for(&user));
        }

        match self.policy {
            ProvisioningPolicy::FailClosed => Err(AuthError::AccountNotProvisioned {
                subject: subject.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
            ProvisioningPolicy::Lazy => self.provision(subject).await,
        }
    }

    async fn provision(&self, subject: &str) -> AuthErrorResult<AuthenticatedIdentity> {
        let profile = self.directory.fetch_profile(subject).await?;
        let email = profile.primary_email.to_lowercase();

        match self.users.find_by_email(&email).await? {
            Some(existing) if existing.has_password() && !existing.has_remote_id() => {
                // A password-owned account is never silently driven by a
                // second authentication origin; the caller is told to use
                // local sign-in instead.
                Err(AuthError::EmailAlreadyRegisteredLocally {
                    email,
                    location: ErrorLocation::from(Location::caller()),
                })
            }
            Some(existing) if !existing.has_remote_id() => {
                // Partially provisioned earlier; bind the subject to finish.
                match self.users.attach_remote_id(existing.id, subject).await {
                    Ok(()) => Ok(identity_for(&existing)),
                    Err(e) if e.is_unique_violation() => self.lookup_after_race(subject).await,
                    Err(e) => Err(e.into()),
                }
            }
            Some(_) => {
                // The email is bound to a different subject already.
                Err(AuthError::EmailAlreadyRegisteredLocally {
                    email,
                    location: ErrorLocation::from(Location::caller()),
                })
            }
            None => {
                let new_user = NewUser {
                    remote_id: Some(subject.to_string()),
                    email,
                    password_hash: None,
                    display_name: profile.display_name,
                    avatar_url: profile.avatar_url,
                };
                match self.users.create(&new_user).await {
                    Ok(user) => Ok(identity_for(&user)),
                    Err(e) if e.is_unique_violation() => self.lookup_after_race(subject).await,
                    Err(e) => Err(e.into()),
                }
            }
        }
    }

    /// The loser of a concurrent double-provisioning race retries as a
    /// lookup: the store's uniqueness constraint already picked the
    /// winner, and the caller must never see the raw violation.
    async fn lookup_after_race(&self, subject: &str) -> AuthErrorResult<AuthenticatedIdentity> {
        match self.users.find_by_remote_id(subject).await? {
            Some(user) => Ok(identity_for(&user)),
            None => Err(AuthError::AccountNotProvisioned {
                subject: subject.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

fn identity_for(user: &User) -> AuthenticatedIdentity {
    AuthenticatedIdentity::from_user(user, AuthMethod::Remote)
}
