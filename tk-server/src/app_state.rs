use crate::config::Config;
use crate::error::{Result as ServerErrorResult, ServerError};

use tk_auth::{
    DualAuthenticator, HttpProviderDirectory, IdentityReconciler, LifecycleEventProcessor,
    LocalTokenAuthority, ProviderDirectory, RemoteTokenVerifier, WebhookSignatureVerifier,
};
use tk_db::UserRepository;

use std::sync::Arc;

use log::{info, warn};
use sqlx::SqlitePool;

/// Shared application state.
///
/// Each authentication capability is an `Option`: it exists only when
/// its secret or key material was supplied, and requests that depend on
/// an absent capability are refused instead of discovering a missing
/// secret mid-flight.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub local_authority: Option<Arc<LocalTokenAuthority>>,
    pub remote_verifier: Option<Arc<RemoteTokenVerifier>>,
    pub authenticator: Arc<DualAuthenticator>,
    pub webhook_verifier: Option<Arc<WebhookSignatureVerifier>>,
    pub lifecycle: Arc<LifecycleEventProcessor>,
}

impl AppState {
    /// Build the full state from configuration, constructing only the
    /// capabilities whose material is present.
    pub fn from_config(config: &Config, pool: SqlitePool) -> ServerErrorResult<Self> {
        let local_authority: Option<Arc<LocalTokenAuthority>> = match config.jwt_secret {
            Some(ref secret) => {
                info!("Local authentication enabled (HS256)");
                Some(Arc::new(LocalTokenAuthority::new(
                    secret.as_bytes(),
                    config.token_ttl_secs,
                )))
            }
            None => {
                warn!("JWT_SECRET not set; local sign-in DISABLED");
                None
            }
        };

        let remote_verifier: Option<Arc<RemoteTokenVerifier>> =
            match resolve_provider_key(config)? {
                Some(pem) => {
                    let verifier =
                        RemoteTokenVerifier::from_rsa_pem(&pem).map_err(|e| {
                            ServerError::EnvVar {
                                message: format!("Provider public key rejected: {}", e),
                            }
                        })?;
                    info!("Remote authentication enabled (RS256)");
                    Some(Arc::new(verifier))
                }
                None => {
                    warn!("No provider public key configured; remote sign-in DISABLED");
                    None
                }
            };

        let webhook_verifier: Option<Arc<WebhookSignatureVerifier>> =
            match config.provider_webhook_secret {
                Some(ref secret) => {
                    let verifier =
                        WebhookSignatureVerifier::new(secret).map_err(|e| ServerError::EnvVar {
                            message: format!("Webhook secret rejected: {}", e),
                        })?;
                    info!("Webhook ingress enabled");
                    Some(Arc::new(verifier))
                }
                None => {
                    warn!("PROVIDER_WEBHOOK_SECRET not set; webhook ingress DISABLED");
                    None
                }
            };

        let directory: Arc<dyn ProviderDirectory> = Arc::new(
            HttpProviderDirectory::new(
                &config.provider_api_url,
                config.provider_api_key.as_deref().unwrap_or_default(),
            )
            .map_err(|e| ServerError::EnvVar {
                message: format!("Failed to build provider directory client: {}", e),
            })?,
        );

        info!(
            "Provisioning policy: {}",
            config.provisioning_policy.as_str()
        );
        let reconciler = IdentityReconciler::new(
            UserRepository::new(pool.clone()),
            directory,
            config.provisioning_policy,
        );

        let authenticator = Arc::new(DualAuthenticator::new(
            local_authority.clone(),
            remote_verifier.clone(),
            UserRepository::new(pool.clone()),
            reconciler,
        ));

        let lifecycle = Arc::new(LifecycleEventProcessor::new(pool.clone()));

        Ok(Self {
            pool,
            local_authority,
            remote_verifier,
            authenticator,
            webhook_verifier,
            lifecycle,
        })
    }
}

fn resolve_provider_key(config: &Config) -> ServerErrorResult<Option<String>> {
    if let Some(ref pem) = config.provider_jwt_public_key {
        return Ok(Some(pem.clone()));
    }
    if let Some(ref path) = config.provider_jwt_public_key_path {
        let pem = std::fs::read_to_string(path).map_err(|e| ServerError::ProviderKeyFile {
            path: path.clone(),
            source: e,
        })?;
        return Ok(Some(pem));
    }
    Ok(None)
}
