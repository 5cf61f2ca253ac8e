use sea_orm::entity::prelude::*;

/// Account record for a LinguaMate user.
/// `password_hash` holds an Argon2id PHC string; `verified` flips to true
/// exactly once, when an emailed one-time code is redeemed.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub verified: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::verification_codes::Entity")]
    VerificationCodes,
}

impl Related<super::verification_codes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VerificationCodes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
