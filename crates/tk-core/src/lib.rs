pub mod error;
pub mod models;

pub use error::error_location::ErrorLocation;
pub use error::{CoreError, Result as CoreResult};
pub use models::auth_method::AuthMethod;
pub use models::task::Task;
pub use models::task_status::TaskStatus;
pub use models::user::User;

#[cfg(test)]
mod tests;
