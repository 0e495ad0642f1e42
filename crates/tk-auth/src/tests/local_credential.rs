use crate::{AuthError, LocalClaims, LocalTokenAuthority};

use tk_core::User;

use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

const SECRET: &[u8] = b"test-secret-key-at-least-32-bytes";

fn test_user(id: i64) -> User {
    let now = Utc::now();
    User {
        id,
        remote_id: None,
        email: "alice@example.com".to_string(),
        password_hash: Some("$argon2id$stub".to_string()),
        display_name: Some("Alice".to_string()),
        avatar_url: None,
        created_at: now,
        updated_at: now,
    }
}

fn encode_with(claims: &LocalClaims, secret: &[u8]) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret),
    )
    .unwrap()
}

#[test]
fn given_issued_token_when_verified_then_claims_round_trip() {
    let authority = LocalTokenAuthority::new(SECRET, 3600);
    let token = authority.issue(&test_user(7)).unwrap();

    let claims = authority.verify(&token).unwrap();

    assert_eq!(claims.id, 7);
    assert_eq!(claims.email, "alice@example.com");
    assert!(claims.exp > claims.iat);
}

#[test]
fn given_expired_token_when_verified_then_expired_error() {
    let authority = LocalTokenAuthority::new(SECRET, 3600);
    let now = Utc::now().timestamp();
    let claims = LocalClaims {
        id: 7,
        email: "alice@example.com".to_string(),
        iat: now - 7200,
        exp: now - 3600,
    };
    let token = encode_with(&claims, SECRET);

    let result = authority.verify(&token);

    assert!(matches!(result, Err(AuthError::Expired { .. })));
}

#[test]
fn given_token_signed_with_wrong_secret_when_verified_then_invalid_signature() {
    let authority = LocalTokenAuthority::new(SECRET, 3600);
    let now = Utc::now().timestamp();
    let claims = LocalClaims {
        id: 7,
        email: "alice@example.com".to_string(),
        iat: now,
        exp: now + 3600,
    };
    let token = encode_with(&claims, b"wrong-secret-key-at-least-32-byt");

    let result = authority.verify(&token);

    assert!(matches!(result, Err(AuthError::InvalidSignature { .. })));
}

#[test]
fn given_garbage_token_when_verified_then_malformed() {
    let authority = LocalTokenAuthority::new(SECRET, 3600);

    let result = authority.verify("not.a.token");

    assert!(matches!(
        result,
        Err(AuthError::MalformedCredential { .. })
    ));
}
