use crate::{hash_password, verify_password};

#[test]
fn given_hashed_password_when_verified_with_same_input_then_true() {
    let hash = hash_password("secret1").unwrap();

    assert!(hash.starts_with("$argon2"));
    assert!(verify_password(&hash, "secret1"));
}

#[test]
fn given_hashed_password_when_verified_with_wrong_input_then_false() {
    let hash = hash_password("secret1").unwrap();

    assert!(!verify_password(&hash, "secret2"));
}

#[test]
fn given_two_hashes_of_same_password_then_salts_differ() {
    let a = hash_password("secret1").unwrap();
    let b = hash_password("secret1").unwrap();

    assert_ne!(a, b);
}

#[test]
fn given_unparsable_stored_hash_when_verified_then_false_not_error() {
    assert!(!verify_password("not-a-phc-string", "secret1"));
}
