//! Bookmark Manager.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::Bookmark;
use crate::error::DomainError;
use crate::ports::{BaseRepository, BookmarkRepository, PostRepository};

pub struct BookmarkService {
    bookmarks: Arc<dyn BookmarkRepository>,
    posts: Arc<dyn PostRepository>,
}

impl BookmarkService {
    pub fn new(bookmarks: Arc<dyn BookmarkRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { bookmarks, posts }
    }

    /// Bookmark a post the user can see. Repeats create another bookmark.
    pub async fn add(&self, user_id: Uuid, post_id: Uuid) -> Result<Bookmark, DomainError> {
        self.posts
            .find_by_id(post_id)
            .await?
            .filter(|post| post.is_visible_to(Some(user_id)))
            .ok_or_else(|| DomainError::post_not_found(post_id))?;

        let bookmark = self.bookmarks.insert(Bookmark::new(user_id, post_id)).await?;
        tracing::debug!(bookmark_id = %bookmark.id, %post_id, "Bookmark added");
        Ok(bookmark)
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Bookmark>, DomainError> {
        Ok(self.bookmarks.find_by_user(user_id).await?)
    }

    /// Remove one of the user's bookmarks. Someone else's bookmark counts as missing.
    pub async fn remove(&self, bookmark_id: Uuid, user_id: Uuid) -> Result<(), DomainError> {
        if !self.bookmarks.delete_for_user(bookmark_id, user_id).await? {
            return Err(DomainError::NotFound {
                entity_type: "Bookmark",
                id: bookmark_id,
            });
        }
        Ok(())
    }
}
