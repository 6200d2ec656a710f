use crate::error::AppError;
use bcrypt::{hash, verify};
use log::debug;

/// bcrypt work factor. Not configurable by callers.
pub const HASH_COST: u32 = bcrypt::DEFAULT_COST;

/// bcrypt only reads this many bytes of input; longer passwords are refused
/// rather than silently truncated.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Hashes a plaintext password with a random salt.
///
/// # Arguments
/// * `password` - The plaintext password. Must not exceed `MAX_PASSWORD_BYTES`.
///
/// # Returns
/// The encoded bcrypt hash.
/// Returns `AppError::ValidationError` if the password is too long, and
/// `AppError::InternalServerError` if hashing itself fails.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(AppError::ValidationError(format!(
            "password: must be at most {} bytes",
            MAX_PASSWORD_BYTES
        )));
    }
    hash(password, HASH_COST).map_err(AppError::from)
}

/// Checks a plaintext password against a stored hash.
///
/// # Arguments
/// * `password` - The candidate plaintext password.
/// * `hashed_password` - A hash previously produced by `hash_password`.
///
/// # Returns
/// `true` only when `password` matches exactly. A malformed hash, or a
/// candidate longer than bcrypt can compare, is reported as a mismatch
/// rather than an error.
pub fn verify_password(password: &str, hashed_password: &str) -> bool {
    if password.len() > MAX_PASSWORD_BYTES {
        return false;
    }
    match verify(password, hashed_password) {
        Ok(matches) => matches,
        Err(e) => {
            debug!("stored password hash could not be checked: {}", e);
            false
        }
    }
}
