//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, IsolationLevel, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use quill_core::domain::{Bookmark, ContentBlock, Credential, Post, User};
use quill_core::error::RepoError;
use quill_core::ports::{
    BookmarkRepository, CredentialRepository, PostRepository, UserRepository,
};

use super::entity::bookmark::{self, Entity as BookmarkEntity};
use super::entity::content_block::{self, Entity as ContentBlockEntity};
use super::entity::credential::{self, Entity as CredentialEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, query_error};
use crate::mask_email;

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL credential repository.
pub type PostgresCredentialRepository = PostgresBaseRepository<CredentialEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL bookmark repository.
pub type PostgresBookmarkRepository = PostgresBaseRepository<BookmarkEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = UserEntity::find()
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl CredentialRepository for PostgresCredentialRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Credential>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding credential by email");

        let result = CredentialEntity::find()
            .filter(credential::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }
}

impl PostgresPostRepository {
    /// Aggregate writes run SERIALIZABLE so concurrent updates of one post cannot interleave.
    async fn begin_serializable(&self) -> Result<DatabaseTransaction, RepoError> {
        self.db
            .begin_with_config(Some(IsolationLevel::Serializable), None)
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))
    }
}

async fn insert_blocks(txn: &DatabaseTransaction, blocks: Vec<ContentBlock>) -> Result<(), RepoError> {
    if blocks.is_empty() {
        return Ok(());
    }

    ContentBlockEntity::insert_many(blocks.into_iter().map(content_block::ActiveModel::from))
        .exec_without_returning(txn)
        .await
        .map_err(query_error)?;

    Ok(())
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_published(&self) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::Published.eq(true))
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::AuthorId.eq(author_id))
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_blocks(&self, post_ids: &[Uuid]) -> Result<Vec<ContentBlock>, RepoError> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        ContentBlockEntity::find()
            .filter(content_block::Column::PostId.is_in(post_ids.iter().copied()))
            .order_by_asc(content_block::Column::PostId)
            .order_by_asc(content_block::Column::Position)
            .all(&self.db)
            .await
            .map_err(query_error)?
            .into_iter()
            .map(ContentBlock::try_from)
            .collect()
    }

    async fn insert_with_blocks(
        &self,
        post: Post,
        blocks: Vec<ContentBlock>,
    ) -> Result<(), RepoError> {
        let txn = self.begin_serializable().await?;

        post::ActiveModel::from(post)
            .insert(&txn)
            .await
            .map_err(query_error)?;
        insert_blocks(&txn, blocks).await?;

        txn.commit().await.map_err(query_error)
    }

    async fn replace_with_blocks(
        &self,
        post: Post,
        blocks: Vec<ContentBlock>,
    ) -> Result<(), RepoError> {
        let txn = self.begin_serializable().await?;
        let post_id = post.id;

        post::ActiveModel {
            id: Set(post_id),
            title: Set(post.title),
            published: Set(post.published),
            ..Default::default()
        }
        .update(&txn)
        .await
        .map_err(query_error)?;

        let removed = ContentBlockEntity::delete_many()
            .filter(content_block::Column::PostId.eq(post_id))
            .exec(&txn)
            .await
            .map_err(query_error)?;
        tracing::debug!(%post_id, removed = removed.rows_affected, "Cleared content blocks");

        insert_blocks(&txn, blocks).await?;

        txn.commit().await.map_err(query_error)
    }
}

#[async_trait]
impl BookmarkRepository for PostgresBookmarkRepository {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Bookmark>, RepoError> {
        let result = BookmarkEntity::find()
            .filter(bookmark::Column::UserId.eq(user_id))
            .order_by_desc(bookmark::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn delete_for_user(&self, id: Uuid, user_id: Uuid) -> Result<bool, RepoError> {
        let result = BookmarkEntity::delete_many()
            .filter(bookmark::Column::Id.eq(id))
            .filter(bookmark::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.rows_affected > 0)
    }
}
