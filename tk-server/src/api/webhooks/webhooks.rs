//! Provider webhook ingress.
//!
//! This handler is a distinct pipeline stage: it takes the raw request
//! bytes, verifies the signature over exactly those bytes, and only
//! then parses JSON and hands the event to the lifecycle processor.
//! No JSON body extractor may run ahead of it.

use crate::api::error::{ApiError, Result as ApiResult};
use crate::app_state::AppState;

use tk_auth::{AuthError, LifecycleEvent};
use tk_core::ErrorLocation;

use std::panic::Location;

use axum::{extract::State, http::HeaderMap, Json};
use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;

/// Minimal acknowledgement returned for every accepted event,
/// recognized or not.
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

/// POST /webhooks/clerk
pub async fn handle_provider_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<WebhookAck>> {
    let verifier =
        state
            .webhook_verifier
            .as_ref()
            .ok_or_else(|| ApiError::Internal {
                message: "Webhook secret not configured".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

    let message_id = required_header(&headers, "svix-id")?;
    let timestamp = required_header(&headers, "svix-timestamp")?;
    let signature = required_header(&headers, "svix-signature")?;

    verifier
        .verify(
            message_id,
            timestamp,
            signature,
            &body,
            Utc::now().timestamp(),
        )
        .map_err(|e| {
            log::warn!("Webhook signature verification failed: {}", e);
            ApiError::BadRequest {
                message: "Invalid signature".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

    // Signature holds; the bytes may now be interpreted.
    let event: LifecycleEvent =
        serde_json::from_slice(&body).map_err(|_| ApiError::BadRequest {
            message: "Malformed event payload".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

    log::info!("Webhook event received: {}", event.kind);

    let outcome = state.lifecycle.process(&event).await.map_err(|e| match e {
        AuthError::Store(db) => ApiError::from(db),
        other => ApiError::Internal {
            message: format!("Webhook processing failed: {}", other),
            location: ErrorLocation::from(Location::caller()),
        },
    })?;

    log::debug!("Webhook event {} -> {:?}", event.kind, outcome);

    Ok(Json(WebhookAck { received: true }))
}

#[track_caller]
fn required_header<'a>(headers: &'a HeaderMap, name: &'static str) -> ApiResult<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::BadRequest {
            message: format!("Missing webhook header {}", name),
            location: ErrorLocation::from(Location::caller()),
        })
}
