use crate::app_state::AppState;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// GET / - Service banner
pub async fn banner() -> Response {
    let body = json!({
        "message": "Taskaya API is running",
        "version": env!("CARGO_PKG_VERSION"),
        "authentication": "local + provider",
        "endpoints": {
            "auth": "/api/auth",
            "tasks": "/api/tasks",
            "webhooks": "/webhooks/clerk",
        },
    });

    (StatusCode::OK, Json(body)).into_response()
}

/// GET /health - Health check with capability status
pub async fn health_check(State(state): State<AppState>) -> Response {
    let database = match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => "operational",
        Err(_) => "unavailable",
    };

    let health = json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "components": {
            "database": database,
            "local_auth": enabled(state.local_authority.is_some()),
            "remote_auth": enabled(state.remote_verifier.is_some()),
            "webhooks": enabled(state.webhook_verifier.is_some()),
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (StatusCode::OK, Json(health)).into_response()
}

/// GET /live - Liveness probe (is the process alive?)
pub async fn liveness_check() -> Response {
    (StatusCode::OK, "OK").into_response()
}

/// GET /ready - Readiness probe (ready to accept traffic?)
pub async fn readiness_check(State(state): State<AppState>) -> Response {
    match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => (StatusCode::OK, "Ready").into_response(),
        Err(_) => (StatusCode::SERVICE_UNAVAILABLE, "Not ready").into_response(),
    }
}

fn enabled(on: bool) -> &'static str {
    if on {
        "enabled"
    } else {
        "disabled"
    }
}
