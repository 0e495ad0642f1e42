//! Webhook payload authenticity.
//!
//! The provider signs `"{id}.{timestamp}.{body}"` with HMAC-SHA256 and
//! sends the result base64-encoded as a space-separated `v1,<sig>`
//! candidate list. Verification must consume the literal received body
//! bytes; re-serializing parsed JSON and verifying against those bytes
//! is a security defect, not an approximation.

use crate::{AuthError, Result as AuthErrorResult};

use tk_core::ErrorLocation;

use std::panic::Location;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Seconds of timestamp drift tolerated before a webhook is rejected.
pub const WEBHOOK_TIMESTAMP_TOLERANCE_SECS: i64 = 300;

const SECRET_PREFIX: &str = "whsec_";
const SIGNATURE_VERSION_PREFIX: &str = "v1,";

pub struct WebhookSignatureVerifier {
    key: Vec<u8>,
}

impl WebhookSignatureVerifier {
    /// The shared secret is distributed as `whsec_<base64>`.
    #[track_caller]
    pub fn new(secret: &str) -> AuthErrorResult<Self> {
        let encoded = secret.strip_prefix(SECRET_PREFIX).unwrap_or(secret);
        let key = STANDARD.decode(encoded).map_err(|_| AuthError::Internal {
            message: "webhook secret is not valid base64".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        Ok(Self { key })
    }

    /// Verify the signature header against the raw body as received.
    ///
    /// `now` is the verifier's current Unix time; the timestamp header
    /// must fall within the tolerance window around it.
    #[track_caller]
    pub fn verify(
        &self,
        message_id: &str,
        timestamp: &str,
        signature_header: &str,
        raw_body: &[u8],
        now: i64,
    ) -> AuthErrorResult<()> {
        let ts: i64 = timestamp
            .parse()
            .map_err(|_| AuthError::WebhookSignatureInvalid {
                location: ErrorLocation::from(Location::caller()),
            })?;

        if (now - ts).abs() > WEBHOOK_TIMESTAMP_TOLERANCE_SECS {
            return Err(AuthError::WebhookSignatureInvalid {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        for candidate in signature_header.split_whitespace() {
            let Some(encoded) = candidate.strip_prefix(SIGNATURE_VERSION_PREFIX) else {
                continue;
            };
            let Ok(signature) = STANDARD.decode(encoded) else {
                continue;
            };

            // verify_slice is constant-time; a fresh MAC per candidate
            // since finalization consumes it.
            let mut mac =
                HmacSha256::new_from_slice(&self.key).map_err(|_| AuthError::Internal {
                    message: "webhook secret rejected by HMAC".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                })?;
            mac.update(message_id.as_bytes());
            mac.update(b".");
            mac.update(timestamp.as_bytes());
            mac.update(b".");
            mac.update(raw_body);

            if mac.verify_slice(&signature).is_ok() {
                return Ok(());
            }
        }

        Err(AuthError::WebhookSignatureInvalid {
            location: ErrorLocation::from(Location::caller()),
        })
    }
}
