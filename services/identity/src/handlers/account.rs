use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use linguamate_session_types::cookie::{set_access_token_cookie, set_refresh_token_cookie};

use crate::domain::repository::UserRepository;
use crate::error::IdentityServiceError;
use crate::extract::Identity;
use crate::state::AppState;
use crate::usecase::password::{ChangePasswordInput, ChangePasswordUseCase};
use crate::usecase::register::{RegisterInput, RegisterUseCase};

// ── POST /account (registration) ─────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// Registration establishes a session immediately: the new account's cookies
/// are set on the 201 response, same as a login.
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse, IdentityServiceError> {
    let usecase = RegisterUseCase {
        users: state.user_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };

    let out = usecase
        .execute(RegisterInput {
            email: body.email,
            password: body.password,
        })
        .await?;

    let jar = set_access_token_cookie(jar, out.access_token, state.cookie_domain.clone());
    let jar = set_refresh_token_cookie(jar, out.refresh_token, state.cookie_domain.clone());

    let mut headers = HeaderMap::new();
    let (name, value) = super::token::token_expires_header(out.access_token_exp);
    headers.insert(name, value);

    Ok((StatusCode::CREATED, jar, headers))
}

// ── GET /account/@me ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct AccountResponse {
    pub id: String,
    pub email: String,
    pub verified: bool,
    #[serde(serialize_with = "linguamate_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "linguamate_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

pub async fn get_me(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<AccountResponse>, IdentityServiceError> {
    let user = state
        .user_repo()
        .find_by_id(identity.user_id)
        .await?
        .ok_or(IdentityServiceError::UserNotFound)?;

    Ok(Json(AccountResponse {
        id: user.id.to_string(),
        email: user.email,
        verified: user.verified,
        created_at: user.created_at,
        updated_at: user.updated_at,
    }))
}

// ── PUT /account/@me/password ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub password: String,
    pub password2: String,
}

pub async fn change_password(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<StatusCode, IdentityServiceError> {
    let usecase = ChangePasswordUseCase {
        users: state.user_repo(),
    };
    usecase
        .execute(
            identity.user_id,
            ChangePasswordInput {
                password: body.password,
                password2: body.password2,
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
