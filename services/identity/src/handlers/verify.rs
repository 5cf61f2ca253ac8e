use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use crate::error::IdentityServiceError;
use crate::state::AppState;
use crate::usecase::verify::{RedeemAction, RedeemCodeInput, RedeemCodeUseCase};

/// What the submitted code is being redeemed for.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifyAction {
    UserVerify,
    PasswordChange,
}

#[derive(Deserialize)]
pub struct VerifyRequest {
    pub otp: String,
    pub action: VerifyAction,
    pub password: Option<String>,
    pub password2: Option<String>,
}

pub async fn redeem_code(
    State(state): State<AppState>,
    Json(body): Json<VerifyRequest>,
) -> Result<StatusCode, IdentityServiceError> {
    let action = match body.action {
        VerifyAction::UserVerify => RedeemAction::VerifyUser,
        VerifyAction::PasswordChange => {
            let (Some(password), Some(password2)) = (body.password, body.password2) else {
                return Err(IdentityServiceError::InvalidData);
            };
            RedeemAction::ChangePassword {
                password,
                password2,
            }
        }
    };

    let usecase = RedeemCodeUseCase {
        users: state.user_repo(),
        codes: state.verification_code_repo(),
    };
    usecase
        .execute(RedeemCodeInput {
            code: body.otp,
            action,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
