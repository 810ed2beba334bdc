//! Credential entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "credentials")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for quill_core::domain::Credential {
    fn from(model: Model) -> Self {
        Self {
            user_id: model.user_id,
            email: model.email,
            password_hash: model.password_hash,
            created_at: model.created_at.into(),
        }
    }
}

impl From<quill_core::domain::Credential> for ActiveModel {
    fn from(credential: quill_core::domain::Credential) -> Self {
        Self {
            user_id: Set(credential.user_id),
            email: Set(credential.email),
            password_hash: Set(credential.password_hash),
            created_at: Set(credential.created_at.into()),
        }
    }
}
