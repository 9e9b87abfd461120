//! Account passwords are stored only as Argon2id PHC strings in
//! `User::password_hash`. A malformed stored hash is an internal error, never a
//! failed login.

use argon2::Argon2;
use password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

use crate::error::{ApiError, ApiResult};

fn internal(context: &str, err: password_hash::Error) -> ApiError {
    tracing::error!("{}: {}", context, err);
    ApiError::Internal("internal server error".to_string())
}

/// Hash with a fresh salt and default Argon2id parameters.
pub fn hash_password(password: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| internal("failed to hash password", e))
}

/// `Ok(false)` on mismatch.
pub fn verify_password(password: &str, hash: &str) -> ApiResult<bool> {
    let stored =
        PasswordHash::new(hash).map_err(|e| internal("stored password hash is malformed", e))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &stored)
        .is_ok())
}
