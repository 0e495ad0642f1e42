use crate::webhook_signature::WEBHOOK_TIMESTAMP_TOLERANCE_SECS;
use crate::{AuthError, WebhookSignatureVerifier};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;

const KEY: &[u8] = b"test-webhook-secret-key";

fn test_secret() -> String {
    format!("whsec_{}", STANDARD.encode(KEY))
}

fn sign(message_id: &str, timestamp: &str, body: &[u8]) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(KEY).unwrap();
    mac.update(message_id.as_bytes());
    mac.update(b".");
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(body);
    format!("v1,{}", STANDARD.encode(mac.finalize().into_bytes()))
}

#[test]
fn given_valid_signature_when_verified_then_accepted() {
    let verifier = WebhookSignatureVerifier::new(&test_secret()).unwrap();
    let now = Utc::now().timestamp();
    let ts = now.to_string();
    let body = br#"{"type":"user.created","data":{"id":"usr_1"}}"#;
    let signature = sign("msg_1", &ts, body);

    assert!(verifier.verify("msg_1", &ts, &signature, body, now).is_ok());
}

#[test]
fn given_signature_over_different_bytes_when_verified_then_rejected() {
    let verifier = WebhookSignatureVerifier::new(&test_secret()).unwrap();
    let now = Utc::now().timestamp();
    let ts = now.to_string();
    let signature = sign("msg_1", &ts, b"original body");

    let result = verifier.verify("msg_1", &ts, &signature, b"tampered body", now);

    assert!(matches!(
        result,
        Err(AuthError::WebhookSignatureInvalid { .. })
    ));
}

#[test]
fn given_stale_timestamp_when_verified_then_rejected() {
    let verifier = WebhookSignatureVerifier::new(&test_secret()).unwrap();
    let now = Utc::now().timestamp();
    let stale = now - WEBHOOK_TIMESTAMP_TOLERANCE_SECS - 1;
    let ts = stale.to_string();
    let body = b"{}";
    let signature = sign("msg_1", &ts, body);

    let result = verifier.verify("msg_1", &ts, &signature, body, now);

    assert!(matches!(
        result,
        Err(AuthError::WebhookSignatureInvalid { .. })
    ));
}

#[test]
fn given_candidate_list_with_one_valid_entry_when_verified_then_accepted() {
    let verifier = WebhookSignatureVerifier::new(&test_secret()).unwrap();
    let now = Utc::now().timestamp();
    let ts = now.to_string();
    let body = b"{}";
    let header = format!("v1,AAAA v2,ignored {}", sign("msg_1", &ts, body));

    assert!(verifier.verify("msg_1", &ts, &header, body, now).is_ok());
}

#[test]
fn given_non_numeric_timestamp_when_verified_then_rejected() {
    let verifier = WebhookSignatureVerifier::new(&test_secret()).unwrap();
    let now = Utc::now().timestamp();
    let body = b"{}";
    let signature = sign("msg_1", "soon", body);

    let result = verifier.verify("msg_1", "soon", &signature, body, now);

    assert!(matches!(
        result,
        Err(AuthError::WebhookSignatureInvalid { .. })
    ));
}

#[test]
fn given_secret_without_prefix_when_constructed_then_still_usable() {
    let bare = STANDARD.encode(KEY);
    let verifier = WebhookSignatureVerifier::new(&bare).unwrap();
    let now = Utc::now().timestamp();
    let ts = now.to_string();
    let body = b"{}";
    let signature = sign("msg_1", &ts, body);

    assert!(verifier.verify("msg_1", &ts, &signature, body, now).is_ok());
}

#[test]
fn given_non_base64_secret_when_constructed_then_error() {
    let result = WebhookSignatureVerifier::new("whsec_!!!not-base64!!!");

    assert!(matches!(result, Err(AuthError::Internal { .. })));
}
