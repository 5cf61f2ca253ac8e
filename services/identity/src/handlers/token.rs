use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use linguamate_session_types::cookie::{
    LINGUAMATE_REFRESH_TOKEN, clear_cookies, set_access_token_cookie, set_refresh_token_cookie,
};

use crate::error::IdentityServiceError;
use crate::extract::Identity;
use crate::state::AppState;
use crate::usecase::login::{LoginInput, LoginUseCase};
use crate::usecase::token::RefreshTokenUseCase;

const X_LINGUAMATE_ACCESS_TOKEN_EXPIRES: &str = "x-linguamate-access-token-expires";

pub(crate) fn token_expires_header(exp: u64) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static(X_LINGUAMATE_ACCESS_TOKEN_EXPIRES),
        HeaderValue::from_str(&exp.to_string()).unwrap(),
    )
}

// ── GET /auth/token ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct CheckTokenResponse {
    pub user_id: uuid::Uuid,
    pub verified: bool,
    pub access_token_exp: u64,
}

pub async fn check_token(identity: Identity) -> Result<impl IntoResponse, IdentityServiceError> {
    let body = CheckTokenResponse {
        user_id: identity.user_id,
        verified: identity.verified,
        access_token_exp: identity.access_token_exp,
    };

    let mut headers = HeaderMap::new();
    let (name, value) = token_expires_header(identity.access_token_exp);
    headers.insert(name, value);

    Ok((StatusCode::OK, headers, Json(body)))
}

// ── POST /auth/token (login) ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateTokenRequest {
    pub email: String,
    pub password: String,
}

pub async fn create_token(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<CreateTokenRequest>,
) -> Result<impl IntoResponse, IdentityServiceError> {
    let usecase = LoginUseCase {
        users: state.user_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };

    let out = usecase
        .execute(LoginInput {
            email: body.email,
            password: body.password,
        })
        .await?;

    let jar = set_access_token_cookie(jar, out.access_token, state.cookie_domain.clone());
    let jar = set_refresh_token_cookie(jar, out.refresh_token, state.cookie_domain.clone());

    let mut headers = HeaderMap::new();
    let (name, value) = token_expires_header(out.access_token_exp);
    headers.insert(name, value);

    Ok((StatusCode::CREATED, jar, headers))
}

// ── PATCH /auth/token ─────────────────────────────────────────────────────────

pub async fn refresh_token(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, IdentityServiceError> {
    let refresh_value = jar
        .get(LINGUAMATE_REFRESH_TOKEN)
        .map(|c| c.value().to_owned())
        .ok_or(IdentityServiceError::InvalidRefreshToken)?;

    let usecase = RefreshTokenUseCase {
        users: state.user_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };

    let out = usecase.execute(&refresh_value).await?;

    let jar = set_access_token_cookie(jar, out.access_token, state.cookie_domain.clone());
    let jar = set_refresh_token_cookie(jar, out.refresh_token, state.cookie_domain.clone());

    let mut headers = HeaderMap::new();
    let (name, value) = token_expires_header(out.access_token_exp);
    headers.insert(name, value);

    Ok((StatusCode::CREATED, jar, headers))
}

// ── DELETE /auth/token ────────────────────────────────────────────────────────

// No identity required: logging out with an expired access token must still
// clear the cookies.
pub async fn revoke_token(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, IdentityServiceError> {
    let jar = clear_cookies(jar, state.cookie_domain.clone());
    Ok((StatusCode::NO_CONTENT, jar))
}
