use uuid::Uuid;

use linguamate_identity::error::IdentityServiceError;
use linguamate_identity::usecase::password::{
    ChangePasswordInput, ChangePasswordUseCase, verify_password,
};

use crate::helpers::{MockUserRepo, test_user};

fn usecase(users: MockUserRepo) -> ChangePasswordUseCase<MockUserRepo> {
    ChangePasswordUseCase { users }
}

#[tokio::test]
async fn should_change_password_for_authenticated_user() {
    let user = test_user("learner@example.com", "secret1");
    let users = MockUserRepo::new(vec![user.clone()]);
    let users_handle = users.users_handle();

    usecase(users)
        .execute(
            user.id,
            ChangePasswordInput {
                password: "newpass9".to_owned(),
                password2: "newpass9".to_owned(),
            },
        )
        .await
        .unwrap();

    let stored_hash = users_handle.lock().unwrap()[0].password_hash.clone();
    assert!(verify_password("newpass9", &stored_hash).unwrap());
}

#[tokio::test]
async fn should_reject_mismatched_confirmation() {
    let user = test_user("learner@example.com", "secret1");
    let users = MockUserRepo::new(vec![user.clone()]);
    let users_handle = users.users_handle();

    let result = usecase(users)
        .execute(
            user.id,
            ChangePasswordInput {
                password: "newpass9".to_owned(),
                password2: "other999".to_owned(),
            },
        )
        .await;

    assert!(matches!(result, Err(IdentityServiceError::NotValid)));

    let stored_hash = users_handle.lock().unwrap()[0].password_hash.clone();
    assert!(
        verify_password("secret1", &stored_hash).unwrap(),
        "stored hash must be unchanged on mismatch"
    );
}

#[tokio::test]
async fn should_reject_short_password() {
    let user = test_user("learner@example.com", "secret1");

    let result = usecase(MockUserRepo::new(vec![user.clone()]))
        .execute(
            user.id,
            ChangePasswordInput {
                password: "short".to_owned(),
                password2: "short".to_owned(),
            },
        )
        .await;

    assert!(matches!(result, Err(IdentityServiceError::InvalidData)));
}

#[tokio::test]
async fn should_reject_session_for_deleted_account() {
    let result = usecase(MockUserRepo::empty())
        .execute(
            Uuid::now_v7(),
            ChangePasswordInput {
                password: "newpass9".to_owned(),
                password2: "newpass9".to_owned(),
            },
        )
        .await;

    assert!(matches!(result, Err(IdentityServiceError::UserNotFound)));
}
