//! Argon2id password hashing, run off the async workers.

use crate::error::IdentityError;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use tokio::task::spawn_blocking;

pub(crate) async fn hash(password: String) -> Result<String, IdentityError> {
    spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| IdentityError::Hash { message: err.to_string().into(), context: None })
    })
    .await
    .map_err(|err| IdentityError::Internal {
        message: err.to_string().into(),
        context: Some("password hashing task".into()),
    })?
}

/// `false` for a wrong password; errors only for an unreadable stored hash.
pub(crate) async fn verify(password: String, stored: String) -> Result<bool, IdentityError> {
    spawn_blocking(move || {
        let parsed = PasswordHash::new(&stored).map_err(|err| IdentityError::Hash {
            message: err.to_string().into(),
            context: Some("stored hash".into()),
        })?;
        Ok(Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
    })
    .await
    .map_err(|err| IdentityError::Internal {
        message: err.to_string().into(),
        context: Some("password verification task".into()),
    })?
}
