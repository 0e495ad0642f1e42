use crate::models::user::REMOTE_TOMBSTONE_PREFIX;
use crate::User;

use chrono::Utc;

fn base_user() -> User {
    let now = Utc::now();
    User {
        id: 1,
        remote_id: None,
        email: "alice@example.com".to_string(),
        password_hash: Some("$argon2id$stub".to_string()),
        display_name: Some("Alice".to_string()),
        avatar_url: None,
        created_at: now,
        updated_at: now,
    }
}

#[test]
fn given_password_user_when_validated_then_ok() {
    let user = base_user();
    assert!(user.validate().is_ok());
    assert!(user.has_password());
    assert!(!user.has_remote_id());
}

#[test]
fn given_remote_only_user_when_validated_then_ok() {
    let mut user = base_user();
    user.password_hash = None;
    user.remote_id = Some("usr_123".to_string());

    assert!(user.validate().is_ok());
    assert!(user.has_remote_id());
}

#[test]
fn given_user_without_any_credential_origin_when_validated_then_error() {
    let mut user = base_user();
    user.password_hash = None;
    user.remote_id = None;

    assert!(user.validate().is_err());
}

#[test]
fn given_tombstoned_remote_id_when_checked_then_is_tombstoned() {
    let mut user = base_user();
    user.remote_id = Some(format!("{}usr_123", REMOTE_TOMBSTONE_PREFIX));

    assert!(user.is_tombstoned());

    user.remote_id = Some("usr_123".to_string());
    assert!(!user.is_tombstoned());
}
