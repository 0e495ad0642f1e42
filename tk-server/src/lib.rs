pub mod api;
pub mod app_state;
pub mod config;
pub mod error;
pub mod health;
pub mod logger;
pub mod routes;

#[cfg(test)]
mod tests;

pub use api::{
    auth::{
        auth::{login, me, register},
        auth_response::AuthResponse,
        login_request::LoginRequest,
        register_request::RegisterRequest,
        user_dto::UserDto,
    },
    error::ApiError,
    error::Result as ApiResult,
    extractors::identity::Identity,
    tasks::{
        create_task_request::CreateTaskRequest,
        search_tasks_query::SearchTasksQuery,
        task_dto::TaskDto,
        task_list_response::TaskListResponse,
        task_response::TaskResponse,
        tasks::{
            create_task, delete_task, list_completed_tasks, list_tasks, list_urgent_tasks,
            search_tasks, update_task,
        },
        update_task_request::UpdateTaskRequest,
    },
    webhooks::webhooks::handle_provider_webhook,
};

pub use crate::app_state::AppState;
pub use crate::config::Config;
pub use crate::error::ServerError;
pub use crate::routes::build_router;
