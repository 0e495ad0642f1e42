//! Local user record.
//!
//! A user originates either from local registration (password set, no
//! remote subject) or from the external identity provider (remote subject
//! set, no password). A record can hold both after an explicit link, but a
//! record with neither credential origin is invalid.

use crate::{CoreError, CoreResult, ErrorLocation};

use std::panic::Location;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Prefix applied to `remote_id` when a provider-deleted account is
/// anonymized. Tombstoned subjects no longer resolve through the
/// reconciler, but the row survives so owned rows keep a valid owner.
pub const REMOTE_TOMBSTONE_PREFIX: &str = "deleted_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    /// Stable subject id assigned by the remote identity provider.
    /// Unique when present.
    pub remote_id: Option<String>,
    /// Lower-cased, globally unique.
    pub email: String,
    /// PHC-format hash; `None` for provider-only users.
    pub password_hash: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }

    pub fn has_remote_id(&self) -> bool {
        self.remote_id.is_some()
    }

    /// Whether this record was anonymized by a provider `deleted` event.
    pub fn is_tombstoned(&self) -> bool {
        self.remote_id
            .as_deref()
            .is_some_and(|r| r.starts_with(REMOTE_TOMBSTONE_PREFIX))
    }

    /// A user must be anchored to at least one credential origin.
    #[track_caller]
    pub fn validate(&self) -> CoreResult<()> {
        if self.password_hash.is_none() && self.remote_id.is_none() {
            return Err(CoreError::Validation {
                message: "user has neither a password nor a remote subject".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        if self.email.is_empty() {
            return Err(CoreError::Validation {
                message: "email cannot be empty".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }
}
