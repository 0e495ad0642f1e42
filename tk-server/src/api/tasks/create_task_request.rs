use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    /// Task title (required)
    pub title: String,

    /// Optional description
    #[serde(default)]
    pub description: Option<String>,

    /// Optional deadline
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,

    /// Urgency flag
    #[serde(default)]
    pub is_urgent: bool,
}
