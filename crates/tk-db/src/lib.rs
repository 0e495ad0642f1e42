pub mod error;
pub mod repositories;

pub use error::{DbError, Result};
pub use repositories::task_repository::{NewTask, TaskRepository};
pub use repositories::user_repository::{NewUser, ProfilePatch, UserRepository};

/// Embedded migrations, run by the server at startup and by tests
/// against in-memory pools.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();
