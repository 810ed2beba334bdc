use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Bookmark, ContentBlock, Credential, Post, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User profile repository.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Fetch several users at once; missing ids are skipped.
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError>;
}

/// Credential repository backing the local identity provider.
#[async_trait]
pub trait CredentialRepository: BaseRepository<Credential, Uuid> {
    /// Find a credential by its email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<Credential>, RepoError>;
}

/// Post repository. Deleting a post removes its content blocks and bookmarks.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Published posts, newest first.
    async fn find_published(&self) -> Result<Vec<Post>, RepoError>;

    /// Every post by `author_id`, newest first.
    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError>;

    /// Content blocks of the given posts, ordered by position within each post.
    async fn find_blocks(&self, post_ids: &[Uuid]) -> Result<Vec<ContentBlock>, RepoError>;

    /// Insert a post row and its blocks.
    async fn insert_with_blocks(
        &self,
        post: Post,
        blocks: Vec<ContentBlock>,
    ) -> Result<(), RepoError>;

    /// Update title/published and swap the post's whole block set for `blocks`.
    async fn replace_with_blocks(
        &self,
        post: Post,
        blocks: Vec<ContentBlock>,
    ) -> Result<(), RepoError>;
}

/// Bookmark repository.
#[async_trait]
pub trait BookmarkRepository: BaseRepository<Bookmark, Uuid> {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Bookmark>, RepoError>;

    /// Delete a bookmark only if it belongs to `user_id`. Returns whether a row was removed.
    async fn delete_for_user(&self, id: Uuid, user_id: Uuid) -> Result<bool, RepoError>;
}
