use crate::api::tasks::task_dto::TaskDto;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub message: String,
    pub task: TaskDto,
}
