use serde::{Deserialize, Serialize};

/// Claims carried by self-issued local tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalClaims {
    /// Local user id.
    pub id: i64,
    pub email: String,
    /// Issued at timestamp (Unix)
    pub iat: i64,
    /// Expiration timestamp (Unix)
    pub exp: i64,
}

/// Claims carried by provider-issued session tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteClaims {
    /// Stable subject id assigned by the provider.
    #[serde(default)]
    pub sub: String,
    /// Authorized party.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azp: Option<String>,
    /// Provider session id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    pub iat: i64,
    pub exp: i64,
}
