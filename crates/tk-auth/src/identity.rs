use tk_core::{AuthMethod, User};

/// Normalized identity attached to an authenticated request.
///
/// Built only after one of the verification paths fully succeeds, read
/// by downstream handlers, discarded with the request. Downstream code
/// never sees the raw credential, and the `method` discriminant is the
/// only trace of which path produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    pub user_id: i64,
    pub email: String,
    pub display_name: Option<String>,
    pub method: AuthMethod,
}

impl AuthenticatedIdentity {
    pub fn from_user(user: &User, method: AuthMethod) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            method,
        }
    }
}
