use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;
use uuid::Uuid;

use linguamate_session_types::cookie::LINGUAMATE_ACCESS_TOKEN;
use linguamate_session_types::token::validate_access_token;

use crate::error::IdentityServiceError;
use crate::state::AppState;

/// Caller identity, extracted from the access-token cookie.
///
/// The session travels with the request: handlers that act on "the logged-in
/// user" take this as an argument instead of consulting any ambient state.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: Uuid,
    pub verified: bool,
    pub access_token_exp: u64,
}

impl FromRequestParts<AppState> for Identity {
    type Rejection = IdentityServiceError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(LINGUAMATE_ACCESS_TOKEN)
            .map(|c| c.value().to_owned())
            .ok_or(IdentityServiceError::InvalidToken)?;

        let info = validate_access_token(&token, &state.jwt_secret)
            .map_err(|_| IdentityServiceError::InvalidToken)?;

        Ok(Identity {
            user_id: info.user_id,
            verified: info.verified,
            access_token_exp: info.access_token_exp,
        })
    }
}
