use crate::api::tasks::task_dto::TaskDto;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct TaskListResponse {
    pub tasks: Vec<TaskDto>,
    pub count: usize,
}

impl From<Vec<TaskDto>> for TaskListResponse {
    fn from(tasks: Vec<TaskDto>) -> Self {
        let count = tasks.len();
        Self { tasks, count }
    }
}
