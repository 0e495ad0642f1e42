//! Password hashing for locally registered users.

use crate::{AuthError, Result as AuthErrorResult};

use tk_core::ErrorLocation;

use std::panic::Location;

use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::{PasswordHash, SaltString};

/// Hash a password into a PHC string with a fresh random salt.
#[track_caller]
pub fn hash_password(password: &str) -> AuthErrorResult<String> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes).map_err(|e| AuthError::Internal {
        message: format!("Failed to source salt entropy: {}", e),
        location: ErrorLocation::from(Location::caller()),
    })?;
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| AuthError::Internal {
        message: format!("Failed to encode salt: {}", e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    let argon2 = Argon2::default();
    let phc = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::Internal {
            message: format!("Failed to hash password: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?
        .to_string();

    Ok(phc)
}

/// Constant-shape verification: an unparsable stored hash verifies
/// false rather than erroring, so callers reject uniformly.
pub fn verify_password(hash: &str, password: &str) -> bool {
    if let Ok(parsed) = PasswordHash::new(hash) {
        let argon2 = Argon2::default();
        argon2.verify_password(password.as_bytes(), &parsed).is_ok()
    } else {
        false
    }
}
