use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SearchTasksQuery {
    /// Search term matched against title and description
    #[serde(default)]
    pub q: String,
}
