//! Bookmark entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "bookmarks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Post,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for quill_core::domain::Bookmark {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            post_id: model.post_id,
            created_at: model.created_at.into(),
        }
    }
}

impl From<quill_core::domain::Bookmark> for ActiveModel {
    fn from(bookmark: quill_core::domain::Bookmark) -> Self {
        Self {
            id: Set(bookmark.id),
            user_id: Set(bookmark.user_id),
            post_id: Set(bookmark.post_id),
            created_at: Set(bookmark.created_at.into()),
        }
    }
}
