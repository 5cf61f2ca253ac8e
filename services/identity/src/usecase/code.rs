use chrono::{Duration, Utc};
use rand::RngExt;
use serde_json::json;
use uuid::Uuid;

use crate::domain::repository::{UserRepository, VerificationCodeRepository};
use crate::domain::types::{CODE_LEN, MAX_ACTIVE_CODES, OutboxEvent, VerificationCode, validate_email};
use crate::error::IdentityServiceError;

/// Charset for generating verification codes (uppercase alphanumeric).
const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

pub struct RequestCodeInput {
    pub email: String,
}

/// Create a verification code for an account and queue its email.
///
/// The same code redeems either consumption role (identity verification or
/// password reset); the role is chosen at redemption time.
pub struct RequestCodeUseCase<U, V>
where
    U: UserRepository,
    V: VerificationCodeRepository,
{
    pub users: U,
    pub codes: V,
    /// Configured code lifetime in seconds.
    pub code_ttl_secs: i64,
}

impl<U, V> RequestCodeUseCase<U, V>
where
    U: UserRepository,
    V: VerificationCodeRepository,
{
    pub async fn execute(&self, input: RequestCodeInput) -> Result<(), IdentityServiceError> {
        if !validate_email(&input.email) {
            return Err(IdentityServiceError::InvalidData);
        }

        // 1. Find the account → 404 if not registered
        let user = self
            .users
            .find_by_email(&input.email)
            .await?
            .ok_or(IdentityServiceError::UserNotFound)?;

        // 2. Check active code limit → 429 at or over the cap
        let active = self.codes.count_active(user.id).await?;
        if active >= MAX_ACTIVE_CODES {
            return Err(IdentityServiceError::TooManyCodes);
        }

        // 3. Generate the code record
        let code_str = generate_code();
        let now = Utc::now();
        let code = VerificationCode {
            id: Uuid::new_v4(),
            user_id: user.id,
            code: code_str.clone(),
            expires_at: now + Duration::seconds(self.code_ttl_secs),
            created_at: now,
        };

        // 4. Write the code + outbox event in the same transaction
        let event = OutboxEvent {
            id: Uuid::new_v4(),
            kind: "verification_code_created".to_owned(),
            payload: json!({ "email": input.email, "code": code_str }),
            idempotency_key: format!("verification_code_created:{}", code.id),
        };

        self.codes.create_with_outbox(&code, &event).await
    }
}
