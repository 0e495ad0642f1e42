//! Provider lifecycle event processing.
//!
//! Push notifications arrive at-least-once and may be reordered, so
//! every handler is safe to run twice for the same event and tolerates
//! update-before-create replays. The processor runs with the same
//! concurrency model as interactive requests and may race the
//! reconciler on the same rows; the store's uniqueness constraints
//! settle those races.

use crate::provider::join_display_name;
use crate::Result as AuthErrorResult;

use tk_db::{DbError, NewUser, ProfilePatch, TaskRepository, UserRepository};

use serde::Deserialize;
use sqlx::SqlitePool;

/// Provider event payload. Parsed only after the signature over the
/// raw body has been verified.
#[derive(Debug, Clone, Deserialize)]
pub struct LifecycleEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: LifecycleEventData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LifecycleEventData {
    /// Remote subject id (session id for `session.ended`).
    pub id: String,
    #[serde(default)]
    pub email_addresses: Vec<EventEmail>,
    #[serde(default)]
    pub primary_email_address_id: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventEmail {
    pub id: String,
    pub email_address: String,
}

/// What the processor did with an event. The webhook response is a
/// plain acknowledgement either way; this is for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleOutcome {
    Created,
    Updated,
    AttachedRemoteId,
    Deleted { purged_tasks: u64 },
    Ignored,
}

pub struct LifecycleEventProcessor {
    pool: SqlitePool,
}

impl LifecycleEventProcessor {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Apply one verified event. Unknown kinds are acknowledged, never
    /// rejected; one unrecognized kind must not fail the webhook.
    pub async fn process(&self, event: &LifecycleEvent) -> AuthErrorResult<LifecycleOutcome> {
        match event.kind.as_str() {
            "user.created" => self.apply_created(&event.data).await,
            "user.updated" => self.apply_updated(&event.data).await,
            "user.deleted" => self.apply_deleted(&event.data).await,
            "session.ended" => {
                // Reserved extension point for session bookkeeping;
                // no local state to invalidate today.
                log::debug!("Session ended: {}", event.data.id);
                Ok(LifecycleOutcome::Ignored)
            }
            other => {
                log::info!("Ignoring unhandled event kind: {}", other);
                Ok(LifecycleOutcome::Ignored)
            }
        }
    }

    async fn apply_created(&self, data: &LifecycleEventData) -> AuthErrorResult<LifecycleOutcome> {
        let users = UserRepository::new(self.pool.clone());

        let Some(email) = primary_email(data) else {
            log::warn!("user.created for {} carries no primary email", data.id);
            return Ok(LifecycleOutcome::Ignored);
        };

        // Redelivery of an event we already applied.
        if users.find_by_remote_id(&data.id).await?.is_some() {
            return Ok(LifecycleOutcome::Ignored);
        }

        if let Some(existing) = users.find_by_email(&email).await? {
            if existing.has_password() && !existing.has_remote_id() {
                // Locally owned account; provider data must not
                // overwrite local credentials.
                log::warn!("user.created for {} matches a password account, skipping", email);
                return Ok(LifecycleOutcome::Ignored);
            }
            if !existing.has_remote_id() {
                return match users.attach_remote_id(existing.id, &data.id).await {
                    Ok(()) => Ok(LifecycleOutcome::AttachedRemoteId),
                    Err(e) if e.is_unique_violation() => Ok(LifecycleOutcome::Ignored),
                    Err(e) => Err(e.into()),
                };
            }
            // Email already bound to a different subject; never merge.
            return Ok(LifecycleOutcome::Ignored);
        }

        let new_user = NewUser {
            remote_id: Some(data.id.clone()),
            email,
            password_hash: None,
            display_name: join_display_name(data.first_name.as_deref(), data.last_name.as_deref()),
            avatar_url: data.image_url.clone(),
        };
        match users.create(&new_user).await {
            Ok(_) => Ok(LifecycleOutcome::Created),
            // Concurrent delivery of the same event; the winner's row stands.
            Err(e) if e.is_unique_violation() => Ok(LifecycleOutcome::Ignored),
            Err(e) => Err(e.into()),
        }
    }

    async fn apply_updated(&self, data: &LifecycleEventData) -> AuthErrorResult<LifecycleOutcome> {
        let users = UserRepository::new(self.pool.clone());

        if users.find_by_remote_id(&data.id).await?.is_none() {
            // The provider may replay update-before-create under retry.
            log::warn!("user.updated for unknown subject {}, creating instead", data.id);
            return self.apply_created(data).await;
        }

        let patch = ProfilePatch {
            email: primary_email(data),
            display_name: join_display_name(data.first_name.as_deref(), data.last_name.as_deref()),
            avatar_url: data.image_url.clone(),
        };

        match users.update_profile_by_remote_id(&data.id, &patch).await {
            Ok(()) => Ok(LifecycleOutcome::Updated),
            Err(e) if e.is_unique_violation() => {
                // The new email belongs to someone else; keep the old
                // address but still refresh the profile fields.
                log::warn!("user.updated for {} collides on email, keeping current", data.id);
                let fallback = ProfilePatch {
                    email: None,
                    ..patch
                };
                users
                    .update_profile_by_remote_id(&data.id, &fallback)
                    .await?;
                Ok(LifecycleOutcome::Updated)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn apply_deleted(&self, data: &LifecycleEventData) -> AuthErrorResult<LifecycleOutcome> {
        let users = UserRepository::new(self.pool.clone());

        // Already tombstoned (or never provisioned): the subject no
        // longer resolves, so a second delivery lands here.
        let Some(user) = users.find_by_remote_id(&data.id).await? else {
            return Ok(LifecycleOutcome::Ignored);
        };

        // Anonymization and task purge commit together; retention is a
        // single decision, not two best-effort steps.
        let mut tx = self.pool.begin().await.map_err(DbError::from)?;
        UserRepository::soft_delete(&mut tx, user.id, &data.id).await?;
        let purged_tasks = TaskRepository::delete_all_for_user(&mut tx, user.id).await?;
        tx.commit().await.map_err(DbError::from)?;

        log::info!(
            "Soft deleted user {} ({} tasks purged)",
            data.id,
            purged_tasks
        );
        Ok(LifecycleOutcome::Deleted { purged_tasks })
    }
}

fn primary_email(data: &LifecycleEventData) -> Option<String> {
    let primary_id = data.primary_email_address_id.as_deref()?;
    let email = data.email_addresses.iter().find(|e| e.id == primary_id)?;
    Some(email.email_address.to_lowercase())
}
