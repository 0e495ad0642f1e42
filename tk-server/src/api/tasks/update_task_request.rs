use tk_core::TaskStatus;

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Partial task update; absent fields keep their current value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,

    #[serde(default)]
    pub is_urgent: Option<bool>,

    #[serde(default)]
    pub completed: Option<bool>,

    #[serde(default)]
    pub status: Option<TaskStatus>,
}
