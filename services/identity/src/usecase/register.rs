use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::UserRepository;
use crate::domain::types::{User, validate_email, validate_password};
use crate::error::IdentityServiceError;
use crate::usecase::password::hash_password;
use crate::usecase::token::{issue_access_token, issue_refresh_token};

pub struct RegisterInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct RegisterOutput {
    pub user: User,
    pub access_token: String,
    pub access_token_exp: u64,
    pub refresh_token: String,
}

/// Create an account and establish its first session.
pub struct RegisterUseCase<U: UserRepository> {
    pub users: U,
    pub jwt_secret: String,
}

impl<U: UserRepository> RegisterUseCase<U> {
    pub async fn execute(&self, input: RegisterInput) -> Result<RegisterOutput, IdentityServiceError> {
        if !validate_email(&input.email) || !validate_password(&input.password) {
            return Err(IdentityServiceError::InvalidData);
        }

        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(IdentityServiceError::UserExists);
        }

        let password_hash = hash_password(&input.password)?;
        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            email: input.email,
            password_hash,
            verified: false,
            created_at: now,
            updated_at: now,
        };
        self.users.create(&user).await?;

        let (access_token, access_token_exp) = issue_access_token(&user, &self.jwt_secret)?;
        let refresh_token = issue_refresh_token(&user, &self.jwt_secret)?;

        Ok(RegisterOutput {
            user,
            access_token,
            access_token_exp,
            refresh_token,
        })
    }
}
