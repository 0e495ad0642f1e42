use tk_core::ErrorLocation;
use tk_db::DbError;

use thiserror::Error;

/// Authentication failure taxonomy.
///
/// Everything except `EmailAlreadyRegisteredLocally` collapses to a
/// single opaque unauthorized response at the API boundary; the
/// variants exist for logging and for the webhook path, which answers
/// provider infrastructure rather than end users.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Malformed credential: {message} {location}")]
    MalformedCredential {
        message: String,
        location: ErrorLocation,
    },

    #[error("Invalid signature {location}")]
    InvalidSignature { location: ErrorLocation },

    #[error("Credential expired {location}")]
    Expired { location: ErrorLocation },

    #[error("Claims do not resolve to an eligible user: {message} {location}")]
    UserMismatch {
        message: String,
        location: ErrorLocation,
    },

    #[error("Remote credential carries no subject {location}")]
    NoSubject { location: ErrorLocation },

    #[error("No local account provisioned for subject {subject} {location}")]
    AccountNotProvisioned {
        subject: String,
        location: ErrorLocation,
    },

    #[error("Email {email} is already registered for password sign-in {location}")]
    EmailAlreadyRegisteredLocally {
        email: String,
        location: ErrorLocation,
    },

    #[error("Authentication capability unavailable: {capability} {location}")]
    CapabilityUnavailable {
        capability: &'static str,
        location: ErrorLocation,
    },

    #[error("Webhook header missing: {header} {location}")]
    WebhookHeadersMissing {
        header: &'static str,
        location: ErrorLocation,
    },

    #[error("Webhook signature invalid {location}")]
    WebhookSignatureInvalid { location: ErrorLocation },

    #[error("Identity provider unreachable: {message} {location}")]
    ProviderUnreachable {
        message: String,
        location: ErrorLocation,
    },

    #[error("Internal authentication failure: {message} {location}")]
    Internal {
        message: String,
        location: ErrorLocation,
    },

    #[error("Store error: {0}")]
    Store(#[from] DbError),
}

impl AuthError {
    /// Stable machine-readable code for structured logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedCredential { .. } => "MALFORMED_CREDENTIAL",
            Self::InvalidSignature { .. } => "INVALID_SIGNATURE",
            Self::Expired { .. } => "EXPIRED",
            Self::UserMismatch { .. } => "USER_MISMATCH",
            Self::NoSubject { .. } => "NO_SUBJECT",
            Self::AccountNotProvisioned { .. } => "ACCOUNT_NOT_PROVISIONED",
            Self::EmailAlreadyRegisteredLocally { .. } => "EMAIL_ALREADY_REGISTERED",
            Self::CapabilityUnavailable { .. } => "CAPABILITY_UNAVAILABLE",
            Self::WebhookHeadersMissing { .. } => "WEBHOOK_HEADERS_MISSING",
            Self::WebhookSignatureInvalid { .. } => "WEBHOOK_SIGNATURE_INVALID",
            Self::ProviderUnreachable { .. } => "PROVIDER_UNREACHABLE",
            Self::Internal { .. } => "INTERNAL",
            Self::Store(_) => "STORE",
        }
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;
