//! Content block entity for SeaORM.
//!
//! `block_type` selects which of `text_content` / `image_url` is populated;
//! the table's CHECK constraint keeps the other one NULL.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use quill_core::domain::{BlockBody, ContentBlock};
use quill_core::error::RepoError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "content_blocks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub post_id: Uuid,
    pub block_type: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub text_content: Option<String>,
    #[sea_orm(nullable)]
    pub image_url: Option<String>,
    pub position: i32,
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

impl TryFrom<Model> for ContentBlock {
    type Error = RepoError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let body = match (model.block_type.as_str(), model.text_content, model.image_url) {
            ("text", Some(text_content), None) => BlockBody::Text { text_content },
            ("image", None, Some(image_url)) => BlockBody::Image { image_url },
            (kind, _, _) => {
                return Err(RepoError::Query(format!(
                    "content block {} has inconsistent columns for type `{kind}`",
                    model.id
                )));
            }
        };

        Ok(Self {
            id: model.id,
            post_id: model.post_id,
            body,
            position: model.position,
        })
    }
}

impl From<ContentBlock> for ActiveModel {
    fn from(block: ContentBlock) -> Self {
        Self {
            id: Set(block.id),
            post_id: Set(block.post_id),
            block_type: Set(block.body.kind().to_string()),
            text_content: Set(block.body.text_content().map(String::from)),
            image_url: Set(block.body.image_url().map(String::from)),
            position: Set(block.position),
        }
    }
}
