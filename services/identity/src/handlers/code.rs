use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use crate::error::IdentityServiceError;
use crate::state::AppState;
use crate::usecase::code::{RequestCodeInput, RequestCodeUseCase};

#[derive(Deserialize)]
pub struct RequestCodeRequest {
    pub email: String,
}

pub async fn request_code(
    State(state): State<AppState>,
    Json(body): Json<RequestCodeRequest>,
) -> Result<StatusCode, IdentityServiceError> {
    let usecase = RequestCodeUseCase {
        users: state.user_repo(),
        codes: state.verification_code_repo(),
        code_ttl_secs: state.code_ttl_secs,
    };
    usecase
        .execute(RequestCodeInput { email: body.email })
        .await?;
    Ok(StatusCode::CREATED)
}
