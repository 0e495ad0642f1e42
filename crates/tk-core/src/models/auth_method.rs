use crate::{CoreError, CoreResult, ErrorLocation};

use std::panic::Location;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which verification path produced an authenticated identity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    /// Self-issued symmetric token, verified with the local signing secret.
    Local,
    /// Provider-issued asymmetric token, verified against the provider's
    /// public key material.
    Remote,
}

impl AuthMethod {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Local => "local",
            Self::Remote => "remote",
        }
    }
}

impl FromStr for AuthMethod {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> CoreResult<Self> {
        match s {
            "local" => Ok(Self::Local),
            "remote" => Ok(Self::Remote),
            _ => Err(CoreError::InvalidAuthMethod {
                value: s.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}
