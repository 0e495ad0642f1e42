//! Task REST API handlers.
//!
//! Every handler takes the `Identity` extractor, so the owner of every
//! row read or written is the authenticated user. Client payloads never
//! carry an owner id.

use crate::api::error::{ApiError, Result as ApiResult};
use crate::api::extractors::identity::Identity;
use crate::api::tasks::create_task_request::CreateTaskRequest;
use crate::api::tasks::search_tasks_query::SearchTasksQuery;
use crate::api::tasks::task_dto::TaskDto;
use crate::api::tasks::task_list_response::TaskListResponse;
use crate::api::tasks::task_response::TaskResponse;
use crate::api::tasks::update_task_request::UpdateTaskRequest;
use crate::app_state::AppState;

use tk_core::ErrorLocation;
use tk_db::{NewTask, TaskRepository};

use std::panic::Location;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};

// =============================================================================
// Handlers
// =============================================================================

/// GET /api/tasks
pub async fn list_tasks(
    State(state): State<AppState>,
    Identity(identity): Identity,
) -> ApiResult<Json<TaskListResponse>> {
    let repo = TaskRepository::new(state.pool.clone());
    let tasks = repo.find_all_for_owner(identity.user_id).await?;

    Ok(Json(collect(tasks)))
}

/// POST /api/tasks
pub async fn create_task(
    State(state): State<AppState>,
    Identity(identity): Identity,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)> {
    let title = req.title.trim();
    if title.is_empty() {
        return Err(ApiError::Validation {
            message: "Title is required".to_string(),
            field: Some("title".to_string()),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    let repo = TaskRepository::new(state.pool.clone());
    let task = repo
        .create(&NewTask {
            owner_id: identity.user_id,
            title: title.to_string(),
            description: normalized(req.description),
            deadline: req.deadline,
            is_urgent: req.is_urgent,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TaskResponse {
            message: "Task created successfully".to_string(),
            task: task.into(),
        }),
    ))
}

/// GET /api/tasks/completed
pub async fn list_completed_tasks(
    State(state): State<AppState>,
    Identity(identity): Identity,
) -> ApiResult<Json<TaskListResponse>> {
    let repo = TaskRepository::new(state.pool.clone());
    let tasks = repo.find_completed_for_owner(identity.user_id).await?;

    Ok(Json(collect(tasks)))
}

/// GET /api/tasks/urgent
pub async fn list_urgent_tasks(
    State(state): State<AppState>,
    Identity(identity): Identity,
) -> ApiResult<Json<TaskListResponse>> {
    let repo = TaskRepository::new(state.pool.clone());
    let tasks = repo.find_urgent_for_owner(identity.user_id).await?;

    Ok(Json(collect(tasks)))
}

/// GET /api/tasks/search?q=...
pub async fn search_tasks(
    State(state): State<AppState>,
    Identity(identity): Identity,
    Query(query): Query<SearchTasksQuery>,
) -> ApiResult<Json<TaskListResponse>> {
    let term = query.q.trim();
    if term.is_empty() {
        return Err(ApiError::Validation {
            message: "Search query is required".to_string(),
            field: Some("q".to_string()),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    let repo = TaskRepository::new(state.pool.clone());
    let tasks = repo.search_for_owner(identity.user_id, term).await?;

    Ok(Json(collect(tasks)))
}

/// PUT /api/tasks/{id}
pub async fn update_task(
    State(state): State<AppState>,
    Identity(identity): Identity,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<TaskResponse>> {
    let repo = TaskRepository::new(state.pool.clone());
    let mut task = repo
        .find_by_id_for_owner(id, identity.user_id)
        .await?
        .ok_or_else(|| task_not_found(id))?;

    if let Some(ref title) = req.title {
        let title = title.trim();
        if title.is_empty() {
            return Err(ApiError::Validation {
                message: "Title cannot be empty".to_string(),
                field: Some("title".to_string()),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        task.title = title.to_string();
    }
    if let Some(description) = req.description {
        task.description = normalized(Some(description));
    }
    if let Some(deadline) = req.deadline {
        task.deadline = Some(deadline);
    }
    if let Some(is_urgent) = req.is_urgent {
        task.is_urgent = is_urgent;
    }
    if let Some(completed) = req.completed {
        task.completed = completed;
    }
    if let Some(status) = req.status {
        task.status = status;
    }
    task.updated_at = Utc::now();

    repo.update(&task).await?;

    Ok(Json(TaskResponse {
        message: "Task updated successfully".to_string(),
        task: task.into(),
    }))
}

/// DELETE /api/tasks/{id}
pub async fn delete_task(
    State(state): State<AppState>,
    Identity(identity): Identity,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let repo = TaskRepository::new(state.pool.clone());
    let deleted = repo.delete_for_owner(id, identity.user_id).await?;

    if !deleted {
        return Err(task_not_found(id));
    }

    Ok(Json(json!({ "message": "Task deleted successfully" })))
}

// =============================================================================
// Helpers
// =============================================================================

fn collect(tasks: Vec<tk_core::Task>) -> TaskListResponse {
    tasks
        .into_iter()
        .map(TaskDto::from)
        .collect::<Vec<_>>()
        .into()
}

fn normalized(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

#[track_caller]
fn task_not_found(id: i64) -> ApiError {
    ApiError::NotFound {
        message: format!("Task {} not found", id),
        location: ErrorLocation::from(Location::caller()),
    }
}
