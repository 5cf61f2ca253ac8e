use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account record as the workflows see it.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// Flips false→true exactly once, when an emailed code is redeemed.
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One-time verification code bound to a user.
///
/// Redeemable for either identity verification or a password reset. Rows are
/// deleted on consumption, so a stored code is unredeemed by definition.
#[derive(Debug, Clone)]
pub struct VerificationCode {
    pub id: Uuid,
    pub user_id: Uuid,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl VerificationCode {
    pub fn is_valid(&self) -> bool {
        self.expires_at > Utc::now()
    }
}

/// Outbox event for async delivery (e.g. verification-code email).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboxEvent {
    pub id: Uuid,
    pub kind: String,
    pub payload: serde_json::Value,
    pub idempotency_key: String,
}

/// Maximum number of active (unexpired) verification codes per user.
pub const MAX_ACTIVE_CODES: u64 = 5;

/// Verification code length in characters.
pub const CODE_LEN: usize = 6;

/// Minimum password length accepted by registration and both change flows.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Check the shape of a submitted email address.
///
/// Deliberately loose: one `@`, a non-empty local part, a dotted domain, no
/// whitespace. Ownership of the address is what the OTP flow proves; this
/// only rejects obvious garbage before it reaches the store.
pub fn validate_email(email: &str) -> bool {
    if email.len() > 254 || email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && !tld.is_empty()
}

/// Check a submitted password against the minimum-length rule.
pub fn validate_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}
