use crate::error::{Result as ServerErrorResult, ServerError};

use tk_auth::ProvisioningPolicy;

use std::net::SocketAddr;

/// Server configuration loaded from environment variables.
///
/// Every secret is optional: a missing secret disables the capability
/// that depends on it (local sign-in, remote verification, webhook
/// ingress) instead of failing startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:5000)
    pub bind_addr: SocketAddr,

    /// SQLite database file (default: taskaya.db)
    pub database_path: String,

    /// Symmetric secret for the local token authority (HS256)
    pub jwt_secret: Option<String>,

    /// Lifetime of issued local tokens in seconds (default: 86400)
    pub token_ttl_secs: i64,

    /// Provider public key for remote token verification (PEM, inline)
    pub provider_jwt_public_key: Option<String>,

    /// Path to the provider public key PEM (used when the inline
    /// variant is not set)
    pub provider_jwt_public_key_path: Option<String>,

    /// Shared secret for webhook signature verification
    pub provider_webhook_secret: Option<String>,

    /// Provider directory API base URL
    pub provider_api_url: String,

    /// Provider directory API key (lazy provisioning profile fetch)
    pub provider_api_key: Option<String>,

    /// What happens when a verified subject has no local record
    pub provisioning_policy: ProvisioningPolicy,

    /// Log level (default: info)
    pub log_level: String,

    /// Enable colored logs (default: true)
    pub log_colored: bool,

    /// Optional log file path; stdout when unset
    pub log_file: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> ServerErrorResult<Self> {
        // Load .env file if present (development)
        let _ = dotenvy::dotenv();

        let bind_addr = std::env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:5000".to_string())
            .parse()
            .map_err(|source| ServerError::InvalidBindAddr { source })?;

        let provisioning_policy = {
            let raw = std::env::var("PROVISIONING_POLICY").unwrap_or_else(|_| "lazy".to_string());
            ProvisioningPolicy::from_name(&raw).ok_or_else(|| ServerError::EnvVar {
                message: format!(
                    "PROVISIONING_POLICY must be 'fail_closed' or 'lazy', got '{}'",
                    raw
                ),
            })?
        };

        let config = Self {
            bind_addr,

            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "taskaya.db".to_string()),

            jwt_secret: std::env::var("JWT_SECRET").ok(),

            token_ttl_secs: std::env::var("TOKEN_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(86400),

            provider_jwt_public_key: std::env::var("PROVIDER_JWT_PUBLIC_KEY").ok(),
            provider_jwt_public_key_path: std::env::var("PROVIDER_JWT_PUBLIC_KEY_PATH").ok(),
            provider_webhook_secret: std::env::var("PROVIDER_WEBHOOK_SECRET").ok(),

            provider_api_url: std::env::var("PROVIDER_API_URL")
                .unwrap_or_else(|_| "https://api.clerk.com".to_string()),
            provider_api_key: std::env::var("PROVIDER_API_KEY").ok(),

            provisioning_policy,

            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),

            log_colored: std::env::var("LOG_COLORED")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(true),

            log_file: std::env::var("LOG_FILE").ok(),
        };

        Ok(config)
    }

    /// Warn about degraded capabilities; none of these is fatal.
    /// Called after logger initialization so the warnings are visible.
    pub fn validate(&self) {
        if self.jwt_secret.is_none()
            && self.provider_jwt_public_key.is_none()
            && self.provider_jwt_public_key_path.is_none()
        {
            log::warn!("Neither JWT_SECRET nor a provider public key is set; every bearer credential will be rejected");
        }

        if self.provisioning_policy == ProvisioningPolicy::Lazy && self.provider_api_key.is_none()
        {
            log::warn!("PROVISIONING_POLICY=lazy without PROVIDER_API_KEY; first-sight remote subjects will fail to provision");
        }
    }
}
