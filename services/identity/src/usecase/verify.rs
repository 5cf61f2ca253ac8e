use crate::domain::repository::{UserRepository, VerificationCodeRepository};
use crate::domain::types::validate_password;
use crate::error::IdentityServiceError;
use crate::usecase::password::hash_password;

/// Longest code string accepted for lookup; anything bigger is garbage input,
/// not a code that could ever have been issued.
const MAX_CODE_INPUT_LEN: usize = 64;

/// What redeeming a code should do.
pub enum RedeemAction {
    /// Prove control of the email address: flip the account's verified flag.
    VerifyUser,
    /// Password reset: replace the stored hash with a hash of `password`.
    ChangePassword { password: String, password2: String },
}

pub struct RedeemCodeInput {
    pub code: String,
    pub action: RedeemAction,
}

/// Redeem a one-time verification code.
///
/// Consumption is a single atomic take: whichever action redeems a code
/// deletes it, so a second redemption of the same code fails with `NotValid`
/// even when two requests race.
pub struct RedeemCodeUseCase<U, V>
where
    U: UserRepository,
    V: VerificationCodeRepository,
{
    pub users: U,
    pub codes: V,
}

impl<U, V> RedeemCodeUseCase<U, V>
where
    U: UserRepository,
    V: VerificationCodeRepository,
{
    pub async fn execute(&self, input: RedeemCodeInput) -> Result<(), IdentityServiceError> {
        if input.code.is_empty() || input.code.len() > MAX_CODE_INPUT_LEN {
            return Err(IdentityServiceError::InvalidData);
        }

        // A confirmation mismatch must not burn the code: the user retypes
        // the passwords and retries with the same one.
        if let RedeemAction::ChangePassword { password, password2 } = &input.action {
            if !validate_password(password) {
                return Err(IdentityServiceError::InvalidData);
            }
            if password != password2 {
                return Err(IdentityServiceError::NotValid);
            }
        }

        let consumed = self
            .codes
            .consume_valid(&input.code)
            .await?
            .ok_or(IdentityServiceError::NotValid)?;

        match input.action {
            RedeemAction::VerifyUser => self.users.set_verified(consumed.user_id).await,
            RedeemAction::ChangePassword { password, .. } => {
                let password_hash = hash_password(&password)?;
                self.users
                    .update_password_hash(consumed.user_id, &password_hash)
                    .await
            }
        }
    }
}
