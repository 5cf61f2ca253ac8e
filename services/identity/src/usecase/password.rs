use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use uuid::Uuid;

use crate::domain::repository::UserRepository;
use crate::domain::types::validate_password;
use crate::error::IdentityServiceError;

/// Hash a password into an Argon2id PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, IdentityServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| IdentityServiceError::Internal(anyhow::anyhow!("hash password: {e}")))?;
    Ok(hash.to_string())
}

/// Check a password against a stored PHC string.
///
/// A malformed stored hash is an internal error, not a mismatch: the store
/// is corrupt, and the caller must not report "wrong password".
pub fn verify_password(password: &str, phc: &str) -> Result<bool, IdentityServiceError> {
    let parsed = PasswordHash::new(phc)
        .map_err(|e| IdentityServiceError::Internal(anyhow::anyhow!("parse password hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

// ── ChangePassword (authenticated, no code) ──────────────────────────────────

pub struct ChangePasswordInput {
    pub password: String,
    pub password2: String,
}

/// Direct password change for a logged-in account.
///
/// The caller identity comes from a validated session, never from a submitted
/// email field.
pub struct ChangePasswordUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> ChangePasswordUseCase<U> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: ChangePasswordInput,
    ) -> Result<(), IdentityServiceError> {
        if !validate_password(&input.password) {
            return Err(IdentityServiceError::InvalidData);
        }
        if input.password != input.password2 {
            return Err(IdentityServiceError::NotValid);
        }

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(IdentityServiceError::UserNotFound)?;

        let password_hash = hash_password(&input.password)?;
        self.users
            .update_password_hash(user.id, &password_hash)
            .await
    }
}
