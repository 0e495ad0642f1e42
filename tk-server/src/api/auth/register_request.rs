use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Email address (required); stored lower-cased
    pub email: String,

    /// Password (required, minimum 8 characters)
    pub password: String,

    /// Optional display name
    #[serde(default)]
    pub name: Option<String>,
}
