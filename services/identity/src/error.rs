use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Identity service domain error variants.
///
/// `InvalidCredentials` and `Internal` both answer with the generic `FAILED`
/// kind: a login rejection is deliberately indistinguishable from "wrong
/// password" vs "no such account", and clients treat unexpected failures the
/// same way.
#[derive(Debug, thiserror::Error)]
pub enum IdentityServiceError {
    #[error("invalid data")]
    InvalidData,
    #[error("user already exists")]
    UserExists,
    #[error("user does not exist")]
    UserNotFound,
    #[error("not valid")]
    NotValid,
    #[error("login failed")]
    InvalidCredentials,
    #[error("invalid token")]
    InvalidToken,
    #[error("invalid refresh token")]
    InvalidRefreshToken,
    #[error("too many verification codes")]
    TooManyCodes,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl IdentityServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidData => "INVALID_DATA",
            Self::UserExists => "USER_EXISTS",
            Self::UserNotFound => "USER_DOES_NOT_EXIST",
            Self::NotValid => "NOT_VALID",
            Self::InvalidCredentials => "FAILED",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::InvalidRefreshToken => "INVALID_REFRESH_TOKEN",
            Self::TooManyCodes => "TOO_MANY_CODES",
            Self::Internal(_) => "FAILED",
        }
    }
}

impl IntoResponse for IdentityServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidData => StatusCode::BAD_REQUEST,
            Self::UserExists => StatusCode::CONFLICT,
            Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::NotValid
            | Self::InvalidCredentials
            | Self::InvalidToken
            | Self::InvalidRefreshToken => StatusCode::UNAUTHORIZED,
            Self::TooManyCodes => StatusCode::TOO_MANY_REQUESTS,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Log 500s only — the trace layer already records method/uri/status for all
        // requests. 4xx are expected client errors; logging them here would be noise.
        // Internal errors need the anyhow chain logged so the root cause is traceable.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "FAILED", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
