//! Salted one-way password hashing (argon2id, PHC string format).

use argon2::{
    password_hash::{
        rand_core::OsRng, Error as PasswordHashError, PasswordHash, PasswordHasher,
        PasswordVerifier, SaltString,
    },
    Argon2,
};
use lazy_static::lazy_static;

use crate::errors::Result;

lazy_static! {
    /// Hash verified when the identifier is unknown, so both failure paths do the same work.
    static ref DUMMY_HASH: Option<String> = hash_password("onekaday-dummy-password").ok();
}

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Returns `Ok(false)` on a mismatch; errors only when the stored hash is unusable.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(password_hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(PasswordHashError::Password) => Ok(false),
        Err(other) => Err(other.into()),
    }
}

/// Burns one verification against a throwaway hash.
pub fn verify_dummy(password: &str) {
    if let Some(hash) = DUMMY_HASH.as_ref() {
        let _ = verify_password(password, hash);
    }
}
