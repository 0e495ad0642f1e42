//! User repository.
//!
//! The reconciler and the lifecycle event processor both mutate this
//! table concurrently. Single-record reads and writes rely on SQLite's
//! per-statement atomicity plus the UNIQUE indexes on `email` and
//! `remote_id`; a losing writer in a double-provisioning race sees a
//! unique violation and retries as a lookup (see `DbError::is_unique_violation`).

use crate::{DbError, Result as DbErrorResult};

use tk_core::models::user::REMOTE_TOMBSTONE_PREFIX;
use tk_core::{ErrorLocation, User};

use std::panic::Location;

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

/// Insert payload for a new user row.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub remote_id: Option<String>,
    /// Must already be lower-cased by the caller.
    pub email: String,
    pub password_hash: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// Partial profile refresh applied by provider `updated` events.
/// Never carries a password: provider data must not overwrite local
/// credentials.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    /// Replacement email (lower-cased). `None` keeps the current value.
    pub email: Option<String>,
    /// New display name; `None` clears it.
    pub display_name: Option<String>,
    /// New avatar URL; `None` clears it.
    pub avatar_url: Option<String>,
}

pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new_user: &NewUser) -> DbErrorResult<User> {
        let now = Utc::now();
        let ts = now.timestamp();

        let result = sqlx::query(
            r#"
                INSERT INTO users (
                    remote_id, email, password_hash, display_name, avatar_url,
                    created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&new_user.remote_id)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(&new_user.display_name)
        .bind(&new_user.avatar_url)
        .bind(ts)
        .bind(ts)
        .execute(&self.pool)
        .await?;

        Ok(User {
            id: result.last_insert_rowid(),
            remote_id: new_user.remote_id.clone(),
            email: new_user.email.clone(),
            password_hash: new_user.password_hash.clone(),
            display_name: new_user.display_name.clone(),
            avatar_url: new_user.avatar_url.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn find_by_id(&self, id: i64) -> DbErrorResult<Option<User>> {
        let row = sqlx::query(
            r#"
                SELECT id, remote_id, email, password_hash, display_name,
                    avatar_url, created_at, updated_at
                FROM users
                WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| map_user(&r)).transpose()
    }

    pub async fn find_by_remote_id(&self, remote_id: &str) -> DbErrorResult<Option<User>> {
        let row = sqlx::query(
            r#"
                SELECT id, remote_id, email, password_hash, display_name,
                    avatar_url, created_at, updated_at
                FROM users
                WHERE remote_id = ?
            "#,
        )
        .bind(remote_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| map_user(&r)).transpose()
    }

    pub async fn find_by_email(&self, email: &str) -> DbErrorResult<Option<User>> {
        let row = sqlx::query(
            r#"
                SELECT id, remote_id, email, password_hash, display_name,
                    avatar_url, created_at, updated_at
                FROM users
                WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| map_user(&r)).transpose()
    }

    /// Complete a partially provisioned record by binding the provider
    /// subject to it. Subject uniqueness is enforced by the index.
    pub async fn attach_remote_id(&self, user_id: i64, remote_id: &str) -> DbErrorResult<()> {
        let ts = Utc::now().timestamp();

        sqlx::query(
            r#"
                UPDATE users
                SET remote_id = ?, updated_at = ?
                WHERE id = ?
            "#,
        )
        .bind(remote_id)
        .bind(ts)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Refresh provider-owned profile fields for the user with this
    /// subject. `password_hash` is deliberately outside this statement.
    pub async fn update_profile_by_remote_id(
        &self,
        remote_id: &str,
        patch: &ProfilePatch,
    ) -> DbErrorResult<()> {
        let ts = Utc::now().timestamp();

        sqlx::query(
            r#"
                UPDATE users
                SET email = COALESCE(?, email),
                    display_name = ?,
                    avatar_url = ?,
                    updated_at = ?
                WHERE remote_id = ?
            "#,
        )
        .bind(&patch.email)
        .bind(&patch.display_name)
        .bind(&patch.avatar_url)
        .bind(ts)
        .bind(remote_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Anonymize a provider-deleted user in place.
    ///
    /// Identity fields are scrubbed and the remote subject is tombstoned
    /// so it no longer resolves, but the row (and therefore task
    /// ownership references) survives.
    ///
    /// Takes a `Transaction` because the caller must commit this
    /// together with the purge of the user's tasks; the two mutations
    /// are a single data-retention decision, not best-effort steps.
    pub async fn soft_delete(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        user_id: i64,
        remote_id: &str,
    ) -> DbErrorResult<()> {
        let ts = Utc::now().timestamp();
        let anonymized_email = format!("deleted_{}@deleted.invalid", remote_id);
        let tombstone = format!("{}{}", REMOTE_TOMBSTONE_PREFIX, remote_id);

        sqlx::query(
            r#"
                UPDATE users
                SET email = ?,
                    display_name = 'Deleted User',
                    avatar_url = NULL,
                    password_hash = NULL,
                    remote_id = ?,
                    updated_at = ?
                WHERE id = ?
            "#,
        )
        .bind(anonymized_email)
        .bind(tombstone)
        .bind(ts)
        .bind(user_id)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}

fn map_user(row: &SqliteRow) -> DbErrorResult<User> {
    Ok(User {
        id: row.try_get("id")?,
        remote_id: row.try_get("remote_id")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        display_name: row.try_get("display_name")?,
        avatar_url: row.try_get("avatar_url")?,
        created_at: DateTime::from_timestamp(row.try_get("created_at")?, 0).ok_or_else(|| {
            DbError::Initialization {
                message: "Invalid timestamp in users.created_at".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })?,
        updated_at: DateTime::from_timestamp(row.try_get("updated_at")?, 0).ok_or_else(|| {
            DbError::Initialization {
                message: "Invalid timestamp in users.updated_at".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })?,
    })
}
