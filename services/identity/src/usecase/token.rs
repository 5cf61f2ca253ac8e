use jsonwebtoken::{EncodingKey, Header, encode};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use linguamate_session_types::cookie::{ACCESS_TOKEN_EXP, REFRESH_TOKEN_EXP};
use linguamate_session_types::token::{JwtClaims, validate_token};

use crate::domain::repository::UserRepository;
use crate::domain::types::User;
use crate::error::IdentityServiceError;

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}

fn sign(claims: &JwtClaims, secret: &str) -> Result<String, IdentityServiceError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| IdentityServiceError::Internal(e.into()))
}

pub fn issue_access_token(
    user: &User,
    secret: &str,
) -> Result<(String, u64), IdentityServiceError> {
    let exp = now_secs() + ACCESS_TOKEN_EXP;
    let claims = JwtClaims {
        sub: user.id.to_string(),
        verified: user.verified,
        exp,
    };
    Ok((sign(&claims, secret)?, exp))
}

pub fn issue_refresh_token(user: &User, secret: &str) -> Result<String, IdentityServiceError> {
    let claims = JwtClaims {
        sub: user.id.to_string(),
        verified: user.verified,
        exp: now_secs() + REFRESH_TOKEN_EXP,
    };
    sign(&claims, secret)
}

// ── RefreshToken ─────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct RefreshTokenOutput {
    pub user_id: Uuid,
    pub verified: bool,
    pub access_token: String,
    pub access_token_exp: u64,
    pub refresh_token: String,
}

pub struct RefreshTokenUseCase<U: UserRepository> {
    pub users: U,
    pub jwt_secret: String,
}

impl<U: UserRepository> RefreshTokenUseCase<U> {
    pub async fn execute(
        &self,
        refresh_token_value: &str,
    ) -> Result<RefreshTokenOutput, IdentityServiceError> {
        // Validate refresh token (sig + exp); an expired access token is irrelevant here.
        let claims = validate_token(refresh_token_value, &self.jwt_secret)
            .map_err(|_| IdentityServiceError::InvalidRefreshToken)?;

        let user_id = claims
            .sub
            .parse::<Uuid>()
            .map_err(|_| IdentityServiceError::InvalidRefreshToken)?;

        // Re-read the user so a verification that happened after the old
        // token was minted is reflected in the new claims.
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(IdentityServiceError::InvalidRefreshToken)?;

        let (access_token, access_token_exp) = issue_access_token(&user, &self.jwt_secret)?;
        let refresh_token = issue_refresh_token(&user, &self.jwt_secret)?;

        Ok(RefreshTokenOutput {
            user_id: user.id,
            verified: user.verified,
            access_token,
            access_token_exp,
            refresh_token,
        })
    }
}
