use crate::api::auth::auth::{login, me, register};
use crate::api::tasks::tasks::{
    create_task, delete_task, list_completed_tasks, list_tasks, list_urgent_tasks, search_tasks,
    update_task,
};
use crate::api::webhooks::webhooks::handle_provider_webhook;
use crate::app_state::AppState;
use crate::health;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

/// Build the application router with all endpoints
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Service banner
        .route("/", get(health::banner))
        // Health check endpoints
        .route("/health", get(health::health_check))
        .route("/live", get(health::liveness_check))
        .route("/ready", get(health::readiness_check))
        // Local authentication
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/me", get(me))
        // Tasks (dual-auth protected)
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route("/api/tasks/completed", get(list_completed_tasks))
        .route("/api/tasks/urgent", get(list_urgent_tasks))
        .route("/api/tasks/search", get(search_tasks))
        .route("/api/tasks/{id}", put(update_task).delete(delete_task))
        // Provider webhook ingress (raw body; no auth extractor)
        .route("/webhooks/clerk", post(handle_provider_webhook))
        // Add shared state
        .with_state(state)
        // CORS middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
