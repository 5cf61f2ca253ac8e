use crate::domain::repository::UserRepository;
use crate::domain::types::{User, validate_email, validate_password};
use crate::error::IdentityServiceError;
use crate::usecase::password::verify_password;
use crate::usecase::token::{issue_access_token, issue_refresh_token};

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct LoginOutput {
    pub user: User,
    pub access_token: String,
    pub access_token_exp: u64,
    pub refresh_token: String,
}

/// Check credentials and mint a session.
///
/// An unknown email and a wrong password surface as the same
/// `InvalidCredentials` rejection so login cannot be used to enumerate
/// accounts.
pub struct LoginUseCase<U: UserRepository> {
    pub users: U,
    pub jwt_secret: String,
}

impl<U: UserRepository> LoginUseCase<U> {
    pub async fn execute(&self, input: LoginInput) -> Result<LoginOutput, IdentityServiceError> {
        if !validate_email(&input.email) || !validate_password(&input.password) {
            return Err(IdentityServiceError::InvalidData);
        }

        let user = self
            .users
            .find_by_email(&input.email)
            .await?
            .ok_or(IdentityServiceError::InvalidCredentials)?;

        if !verify_password(&input.password, &user.password_hash)? {
            return Err(IdentityServiceError::InvalidCredentials);
        }

        let (access_token, access_token_exp) = issue_access_token(&user, &self.jwt_secret)?;
        let refresh_token = issue_refresh_token(&user, &self.jwt_secret)?;

        Ok(LoginOutput {
            user,
            access_token,
            access_token_exp,
            refresh_token,
        })
    }
}
