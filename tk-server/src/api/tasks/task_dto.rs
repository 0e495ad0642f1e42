use tk_core::Task;

use serde::Serialize;

/// Task DTO for JSON serialization
#[derive(Debug, Serialize)]
pub struct TaskDto {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub deadline: Option<i64>,
    pub is_urgent: bool,
    pub completed: bool,
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<Task> for TaskDto {
    fn from(t: Task) -> Self {
        Self {
            id: t.id,
            title: t.title,
            description: t.description,
            deadline: t.deadline.map(|d| d.timestamp()),
            is_urgent: t.is_urgent,
            completed: t.completed,
            status: t.status.as_str().to_string(),
            created_at: t.created_at.timestamp(),
            updated_at: t.updated_at.timestamp(),
        }
    }
}
