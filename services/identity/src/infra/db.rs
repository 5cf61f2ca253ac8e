use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, PaginatorTrait, QueryFilter, QuerySelect, TransactionTrait,
};
use uuid::Uuid;

use linguamate_identity_schema::{outbox_events, users, verification_codes};

use crate::domain::repository::{UserRepository, VerificationCodeRepository};
use crate::domain::types::{OutboxEvent, User, VerificationCode};
use crate::error::IdentityServiceError;

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, IdentityServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, IdentityServiceError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn create(&self, user: &User) -> Result<(), IdentityServiceError> {
        users::ActiveModel {
            id: Set(user.id),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            verified: Set(user.verified),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create user")?;
        Ok(())
    }

    async fn set_verified(&self, id: Uuid) -> Result<(), IdentityServiceError> {
        users::ActiveModel {
            id: Set(id),
            verified: Set(true),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("set user verified")?;
        Ok(())
    }

    async fn update_password_hash(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> Result<(), IdentityServiceError> {
        users::ActiveModel {
            id: Set(id),
            password_hash: Set(password_hash.to_owned()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update user password hash")?;
        Ok(())
    }
}

// ── VerificationCode repository ──────────────────────────────────────────────

#[derive(Clone)]
pub struct DbVerificationCodeRepository {
    pub db: DatabaseConnection,
}

impl VerificationCodeRepository for DbVerificationCodeRepository {
    async fn count_active(&self, user_id: Uuid) -> Result<u64, IdentityServiceError> {
        let now = Utc::now();
        let count = verification_codes::Entity::find()
            .filter(verification_codes::Column::UserId.eq(user_id))
            .filter(verification_codes::Column::ExpiresAt.gt(now))
            .count(&self.db)
            .await
            .context("count active verification codes")?;
        Ok(count)
    }

    async fn create_with_outbox(
        &self,
        code: &VerificationCode,
        event: &OutboxEvent,
    ) -> Result<(), IdentityServiceError> {
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                let code = code.clone();
                let event = event.clone();
                Box::pin(async move {
                    insert_verification_code(txn, &code).await?;
                    insert_outbox_event(txn, &event).await?;
                    Ok(())
                })
            })
            .await
            .context("create verification code with outbox")?;
        Ok(())
    }

    async fn consume_valid(
        &self,
        code: &str,
    ) -> Result<Option<VerificationCode>, IdentityServiceError> {
        let consumed = self
            .db
            .transaction::<_, Option<VerificationCode>, sea_orm::DbErr>(|txn| {
                let code = code.to_owned();
                Box::pin(async move {
                    let now = Utc::now();
                    // SELECT ... FOR UPDATE: a concurrent redemption of the
                    // same code blocks here until this transaction commits,
                    // then sees no row.
                    let model = verification_codes::Entity::find()
                        .filter(verification_codes::Column::Code.eq(code))
                        .filter(verification_codes::Column::ExpiresAt.gt(now))
                        .lock_exclusive()
                        .one(txn)
                        .await?;

                    let Some(model) = model else {
                        return Ok(None);
                    };

                    verification_codes::Entity::delete_by_id(model.id)
                        .exec(txn)
                        .await?;

                    Ok(Some(code_from_model(model)))
                })
            })
            .await
            .context("consume verification code")?;
        Ok(consumed)
    }
}

async fn insert_verification_code(
    txn: &DatabaseTransaction,
    code: &VerificationCode,
) -> Result<(), sea_orm::DbErr> {
    verification_codes::ActiveModel {
        id: Set(code.id),
        user_id: Set(code.user_id),
        code: Set(code.code.clone()),
        expires_at: Set(code.expires_at),
        created_at: Set(code.created_at),
    }
    .insert(txn)
    .await?;
    Ok(())
}

async fn insert_outbox_event(
    txn: &DatabaseTransaction,
    event: &OutboxEvent,
) -> Result<(), sea_orm::DbErr> {
    let now = Utc::now();
    outbox_events::ActiveModel {
        id: Set(event.id),
        kind: Set(event.kind.clone()),
        payload: Set(event.payload.clone()),
        idempotency_key: Set(event.idempotency_key.clone()),
        attempts: Set(0),
        last_error: Set(None),
        created_at: Set(now),
        next_attempt_at: Set(now),
        processed_at: Set(None),
        failed_at: Set(None),
    }
    .insert(txn)
    .await?;
    Ok(())
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        password_hash: model.password_hash,
        verified: model.verified,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn code_from_model(model: verification_codes::Model) -> VerificationCode {
    VerificationCode {
        id: model.id,
        user_id: model.user_id,
        code: model.code,
        expires_at: model.expires_at,
        created_at: model.created_at,
    }
}
