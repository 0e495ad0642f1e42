use tk_core::User;

use serde::Serialize;

/// User DTO for JSON serialization; never carries credential material.
#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: i64,
    pub email: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.display_name,
            avatar_url: u.avatar_url,
        }
    }
}
