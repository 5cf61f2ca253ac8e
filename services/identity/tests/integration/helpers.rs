use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use uuid::Uuid;

use linguamate_identity::domain::repository::{UserRepository, VerificationCodeRepository};
use linguamate_identity::domain::types::{OutboxEvent, User, VerificationCode};
use linguamate_identity::error::IdentityServiceError;
use linguamate_identity::usecase::password::hash_password;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-for-integration-tests-only";

// ── MockUserRepo ─────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockUserRepo {
    pub users: Arc<Mutex<Vec<User>>>,
}

impl MockUserRepo {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Shared handle to the stored users for post-execution inspection.
    pub fn users_handle(&self) -> Arc<Mutex<Vec<User>>> {
        Arc::clone(&self.users)
    }
}

impl UserRepository for MockUserRepo {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, IdentityServiceError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, IdentityServiceError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn create(&self, user: &User) -> Result<(), IdentityServiceError> {
        self.users.lock().unwrap().push(user.clone());
        Ok(())
    }

    async fn set_verified(&self, id: Uuid) -> Result<(), IdentityServiceError> {
        let mut users = self.users.lock().unwrap();
        if let Some(u) = users.iter_mut().find(|u| u.id == id) {
            u.verified = true;
            u.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn update_password_hash(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> Result<(), IdentityServiceError> {
        let mut users = self.users.lock().unwrap();
        if let Some(u) = users.iter_mut().find(|u| u.id == id) {
            u.password_hash = password_hash.to_owned();
            u.updated_at = Utc::now();
        }
        Ok(())
    }
}

// ── MockCodeRepo ─────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockCodeRepo {
    pub codes: Arc<Mutex<Vec<VerificationCode>>>,
    pub events: Arc<Mutex<Vec<OutboxEvent>>>,
}

impl MockCodeRepo {
    pub fn new(codes: Vec<VerificationCode>) -> Self {
        Self {
            codes: Arc::new(Mutex::new(codes)),
            events: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn codes_handle(&self) -> Arc<Mutex<Vec<VerificationCode>>> {
        Arc::clone(&self.codes)
    }

    pub fn events_handle(&self) -> Arc<Mutex<Vec<OutboxEvent>>> {
        Arc::clone(&self.events)
    }
}

impl VerificationCodeRepository for MockCodeRepo {
    async fn count_active(&self, user_id: Uuid) -> Result<u64, IdentityServiceError> {
        Ok(self
            .codes
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.user_id == user_id && c.is_valid())
            .count() as u64)
    }

    async fn create_with_outbox(
        &self,
        code: &VerificationCode,
        event: &OutboxEvent,
    ) -> Result<(), IdentityServiceError> {
        self.codes.lock().unwrap().push(code.clone());
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn consume_valid(
        &self,
        code: &str,
    ) -> Result<Option<VerificationCode>, IdentityServiceError> {
        let mut codes = self.codes.lock().unwrap();
        let found = codes.iter().position(|c| c.code == code && c.is_valid());
        Ok(found.map(|idx| codes.remove(idx)))
    }
}

// ── Test fixture helpers ─────────────────────────────────────────────────────

pub fn test_user(email: &str, password: &str) -> User {
    let now = Utc::now();
    User {
        id: Uuid::now_v7(),
        email: email.to_owned(),
        password_hash: hash_password(password).unwrap(),
        verified: false,
        created_at: now,
        updated_at: now,
    }
}

pub fn test_code(user_id: Uuid, code: &str) -> VerificationCode {
    VerificationCode {
        id: Uuid::new_v4(),
        user_id,
        code: code.to_owned(),
        expires_at: Utc::now() + Duration::seconds(600),
        created_at: Utc::now(),
    }
}

pub fn expired_code(user_id: Uuid, code: &str) -> VerificationCode {
    VerificationCode {
        id: Uuid::new_v4(),
        user_id,
        code: code.to_owned(),
        expires_at: Utc::now() - Duration::seconds(1),
        created_at: Utc::now() - Duration::seconds(601),
    }
}
