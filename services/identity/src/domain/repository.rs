#![allow(async_fn_in_trait)]

use uuid::Uuid;

use crate::domain::types::{OutboxEvent, User, VerificationCode};
use crate::error::IdentityServiceError;

/// Repository for account records.
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, IdentityServiceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, IdentityServiceError>;

    async fn create(&self, user: &User) -> Result<(), IdentityServiceError>;

    /// Flip the verified flag to true (idempotent).
    async fn set_verified(&self, id: Uuid) -> Result<(), IdentityServiceError>;

    async fn update_password_hash(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> Result<(), IdentityServiceError>;
}

/// Repository for one-time verification codes.
pub trait VerificationCodeRepository: Send + Sync {
    /// Count active (unexpired) codes for a user.
    async fn count_active(&self, user_id: Uuid) -> Result<u64, IdentityServiceError>;

    /// Insert a new code and an outbox event atomically (same transaction).
    async fn create_with_outbox(
        &self,
        code: &VerificationCode,
        event: &OutboxEvent,
    ) -> Result<(), IdentityServiceError>;

    /// Atomically take a valid (unexpired) code out of the store.
    ///
    /// Returns `None` when the code is unknown, expired, or already consumed.
    /// The row is locked and deleted in one transaction, so two concurrent
    /// redemptions of the same code cannot both succeed.
    async fn consume_valid(
        &self,
        code: &str,
    ) -> Result<Option<VerificationCode>, IdentityServiceError>;
}
