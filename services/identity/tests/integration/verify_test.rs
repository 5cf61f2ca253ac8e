use linguamate_identity::error::IdentityServiceError;
use linguamate_identity::usecase::password::verify_password;
use linguamate_identity::usecase::verify::{RedeemAction, RedeemCodeInput, RedeemCodeUseCase};

use crate::helpers::{MockCodeRepo, MockUserRepo, expired_code, test_code, test_user};

fn usecase(users: MockUserRepo, codes: MockCodeRepo) -> RedeemCodeUseCase<MockUserRepo, MockCodeRepo> {
    RedeemCodeUseCase { users, codes }
}

#[tokio::test]
async fn should_verify_user_and_burn_code() {
    let user = test_user("learner@example.com", "secret1");
    let users = MockUserRepo::new(vec![user.clone()]);
    let users_handle = users.users_handle();
    let codes = MockCodeRepo::new(vec![test_code(user.id, "ABC123")]);

    usecase(users.clone(), codes.clone())
        .execute(RedeemCodeInput {
            code: "ABC123".to_owned(),
            action: RedeemAction::VerifyUser,
        })
        .await
        .unwrap();

    assert!(users_handle.lock().unwrap()[0].verified);
    assert!(codes.codes_handle().lock().unwrap().is_empty());

    // Single-use: the same code cannot be redeemed again, for either role.
    let again = usecase(users, codes)
        .execute(RedeemCodeInput {
            code: "ABC123".to_owned(),
            action: RedeemAction::VerifyUser,
        })
        .await;
    assert!(matches!(again, Err(IdentityServiceError::NotValid)));
}

#[tokio::test]
async fn should_change_password_and_burn_code() {
    let user = test_user("learner@example.com", "secret1");
    let users = MockUserRepo::new(vec![user.clone()]);
    let users_handle = users.users_handle();
    let codes = MockCodeRepo::new(vec![test_code(user.id, "XYZ789")]);

    usecase(users.clone(), codes.clone())
        .execute(RedeemCodeInput {
            code: "XYZ789".to_owned(),
            action: RedeemAction::ChangePassword {
                password: "newpass9".to_owned(),
                password2: "newpass9".to_owned(),
            },
        })
        .await
        .unwrap();

    let stored_hash = users_handle.lock().unwrap()[0].password_hash.clone();
    assert!(verify_password("newpass9", &stored_hash).unwrap());
    assert!(!verify_password("secret1", &stored_hash).unwrap());

    // Consumed for password change, so gone for verification too.
    let again = usecase(users, codes)
        .execute(RedeemCodeInput {
            code: "XYZ789".to_owned(),
            action: RedeemAction::VerifyUser,
        })
        .await;
    assert!(matches!(again, Err(IdentityServiceError::NotValid)));
}

#[tokio::test]
async fn should_not_burn_code_on_password_mismatch() {
    let user = test_user("learner@example.com", "secret1");
    let users = MockUserRepo::new(vec![user.clone()]);
    let users_handle = users.users_handle();
    let codes = MockCodeRepo::new(vec![test_code(user.id, "XYZ789")]);

    let result = usecase(users.clone(), codes.clone())
        .execute(RedeemCodeInput {
            code: "XYZ789".to_owned(),
            action: RedeemAction::ChangePassword {
                password: "newpass9".to_owned(),
                password2: "different9".to_owned(),
            },
        })
        .await;

    assert!(matches!(result, Err(IdentityServiceError::NotValid)));

    // The stored hash is untouched and the code is still redeemable.
    let stored_hash = users_handle.lock().unwrap()[0].password_hash.clone();
    assert!(verify_password("secret1", &stored_hash).unwrap());
    assert_eq!(codes.codes_handle().lock().unwrap().len(), 1);

    let retry = usecase(users, codes)
        .execute(RedeemCodeInput {
            code: "XYZ789".to_owned(),
            action: RedeemAction::ChangePassword {
                password: "newpass9".to_owned(),
                password2: "newpass9".to_owned(),
            },
        })
        .await;
    assert!(retry.is_ok(), "mismatch must not consume the code");
}

#[tokio::test]
async fn should_reject_expired_code() {
    let user = test_user("learner@example.com", "secret1");
    let users = MockUserRepo::new(vec![user.clone()]);
    let users_handle = users.users_handle();
    let codes = MockCodeRepo::new(vec![expired_code(user.id, "OLD111")]);

    let result = usecase(users, codes)
        .execute(RedeemCodeInput {
            code: "OLD111".to_owned(),
            action: RedeemAction::VerifyUser,
        })
        .await;

    assert!(matches!(result, Err(IdentityServiceError::NotValid)));
    assert!(!users_handle.lock().unwrap()[0].verified);
}

#[tokio::test]
async fn should_reject_unknown_code() {
    let user = test_user("learner@example.com", "secret1");

    let result = usecase(MockUserRepo::new(vec![user]), MockCodeRepo::empty())
        .execute(RedeemCodeInput {
            code: "NOPE42".to_owned(),
            action: RedeemAction::VerifyUser,
        })
        .await;

    assert!(matches!(result, Err(IdentityServiceError::NotValid)));
}

#[tokio::test]
async fn should_reject_empty_code_as_invalid_data() {
    let result = usecase(MockUserRepo::empty(), MockCodeRepo::empty())
        .execute(RedeemCodeInput {
            code: String::new(),
            action: RedeemAction::VerifyUser,
        })
        .await;

    assert!(matches!(result, Err(IdentityServiceError::InvalidData)));
}

#[tokio::test]
async fn should_reject_short_new_password_without_touching_code() {
    let user = test_user("learner@example.com", "secret1");
    let codes = MockCodeRepo::new(vec![test_code(user.id, "XYZ789")]);

    let result = usecase(MockUserRepo::new(vec![user]), codes.clone())
        .execute(RedeemCodeInput {
            code: "XYZ789".to_owned(),
            action: RedeemAction::ChangePassword {
                password: "short".to_owned(),
                password2: "short".to_owned(),
            },
        })
        .await;

    assert!(matches!(result, Err(IdentityServiceError::InvalidData)));
    assert_eq!(codes.codes_handle().lock().unwrap().len(), 1);
}
