//! In-memory repositories - used when no database is configured, and in tests.
//!
//! All repositories handed out by one [`InMemoryDatabase`] share the same tables,
//! so deleting a post also drops its content blocks and bookmarks.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Bookmark, ContentBlock, Credential, Post, User};
use quill_core::error::RepoError;
use quill_core::ports::{
    BaseRepository, BookmarkRepository, CredentialRepository, PostRepository, UserRepository,
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    credentials: HashMap<Uuid, Credential>,
    /// Insertion order is kept so equal timestamps still list newest first.
    posts: Vec<Post>,
    blocks: Vec<ContentBlock>,
    bookmarks: Vec<Bookmark>,
}

impl Tables {
    fn post_exists(&self, id: Uuid) -> bool {
        self.posts.iter().any(|post| post.id == id)
    }

    fn newest_first<'a>(posts: impl DoubleEndedIterator<Item = &'a Post>) -> Vec<Post> {
        let mut posts: Vec<Post> = posts.rev().cloned().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts
    }
}

/// Shared in-memory table set.
#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> InMemoryUserRepository {
        InMemoryUserRepository {
            tables: self.tables.clone(),
        }
    }

    pub fn credentials(&self) -> InMemoryCredentialRepository {
        InMemoryCredentialRepository {
            tables: self.tables.clone(),
        }
    }

    pub fn posts(&self) -> InMemoryPostRepository {
        InMemoryPostRepository {
            tables: self.tables.clone(),
        }
    }

    pub fn bookmarks(&self) -> InMemoryBookmarkRepository {
        InMemoryBookmarkRepository {
            tables: self.tables.clone(),
        }
    }
}

pub struct InMemoryUserRepository {
    tables: Arc<RwLock<Tables>>,
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.users.contains_key(&user.id) {
            return Err(RepoError::Constraint(format!("user {} already exists", user.id)));
        }
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(RepoError::Constraint("email already in use".to_string()));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.tables
            .write()
            .await
            .users
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.users.get(id).cloned())
            .collect())
    }
}

pub struct InMemoryCredentialRepository {
    tables: Arc<RwLock<Tables>>,
}

#[async_trait]
impl BaseRepository<Credential, Uuid> for InMemoryCredentialRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Credential>, RepoError> {
        Ok(self.tables.read().await.credentials.get(&id).cloned())
    }

    async fn insert(&self, credential: Credential) -> Result<Credential, RepoError> {
        let mut tables = self.tables.write().await;
        if tables
            .credentials
            .values()
            .any(|c| c.user_id == credential.user_id || c.email == credential.email)
        {
            return Err(RepoError::Constraint("credential already exists".to_string()));
        }
        tables
            .credentials
            .insert(credential.user_id, credential.clone());
        Ok(credential)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.tables
            .write()
            .await
            .credentials
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl CredentialRepository for InMemoryCredentialRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Credential>, RepoError> {
        Ok(self
            .tables
            .read()
            .await
            .credentials
            .values()
            .find(|c| c.email == email)
            .cloned())
    }
}

pub struct InMemoryPostRepository {
    tables: Arc<RwLock<Tables>>,
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self
            .tables
            .read()
            .await
            .posts
            .iter()
            .find(|post| post.id == id)
            .cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.post_exists(post.id) {
            return Err(RepoError::Constraint(format!("post {} already exists", post.id)));
        }
        tables.posts.push(post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.post_exists(id) {
            return Err(RepoError::NotFound);
        }
        tables.posts.retain(|post| post.id != id);
        tables.blocks.retain(|block| block.post_id != id);
        tables.bookmarks.retain(|bookmark| bookmark.post_id != id);
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_published(&self) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(Tables::newest_first(
            tables.posts.iter().filter(|post| post.published),
        ))
    }

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(Tables::newest_first(
            tables.posts.iter().filter(|post| post.author_id == author_id),
        ))
    }

    async fn find_blocks(&self, post_ids: &[Uuid]) -> Result<Vec<ContentBlock>, RepoError> {
        let tables = self.tables.read().await;
        let mut blocks: Vec<ContentBlock> = tables
            .blocks
            .iter()
            .filter(|block| post_ids.contains(&block.post_id))
            .cloned()
            .collect();
        blocks.sort_by_key(|block| (block.post_id, block.position));
        Ok(blocks)
    }

    async fn insert_with_blocks(
        &self,
        post: Post,
        blocks: Vec<ContentBlock>,
    ) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.post_exists(post.id) {
            return Err(RepoError::Constraint(format!("post {} already exists", post.id)));
        }
        tables.posts.push(post);
        tables.blocks.extend(blocks);
        Ok(())
    }

    async fn replace_with_blocks(
        &self,
        post: Post,
        blocks: Vec<ContentBlock>,
    ) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .posts
            .iter_mut()
            .find(|stored| stored.id == post.id)
            .ok_or(RepoError::NotFound)?;
        stored.title = post.title;
        stored.published = post.published;

        tables.blocks.retain(|block| block.post_id != post.id);
        tables.blocks.extend(blocks);
        Ok(())
    }
}

pub struct InMemoryBookmarkRepository {
    tables: Arc<RwLock<Tables>>,
}

#[async_trait]
impl BaseRepository<Bookmark, Uuid> for InMemoryBookmarkRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Bookmark>, RepoError> {
        Ok(self
            .tables
            .read()
            .await
            .bookmarks
            .iter()
            .find(|bookmark| bookmark.id == id)
            .cloned())
    }

    async fn insert(&self, bookmark: Bookmark) -> Result<Bookmark, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.post_exists(bookmark.post_id) {
            return Err(RepoError::Constraint(format!(
                "post {} does not exist",
                bookmark.post_id
            )));
        }
        tables.bookmarks.push(bookmark.clone());
        Ok(bookmark)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        let before = tables.bookmarks.len();
        tables.bookmarks.retain(|bookmark| bookmark.id != id);
        if tables.bookmarks.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl BookmarkRepository for InMemoryBookmarkRepository {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Bookmark>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .bookmarks
            .iter()
            .rev()
            .filter(|bookmark| bookmark.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn delete_for_user(&self, id: Uuid, user_id: Uuid) -> Result<bool, RepoError> {
        let mut tables = self.tables.write().await;
        let before = tables.bookmarks.len();
        tables
            .bookmarks
            .retain(|bookmark| !(bookmark.id == id && bookmark.user_id == user_id));
        Ok(tables.bookmarks.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_post_delete_cascades() {
        let db = InMemoryDatabase::new();
        let posts = db.posts();
        let bookmarks = db.bookmarks();
        let post = Post::new(Uuid::new_v4(), "Title".to_string(), true);
        let block = ContentBlock::new(post.id, quill_core::domain::BlockBody::text("hi"), 1);

        posts
            .insert_with_blocks(post.clone(), vec![block])
            .await
            .unwrap();
        bookmarks
            .insert(Bookmark::new(Uuid::new_v4(), post.id))
            .await
            .unwrap();

        posts.delete(post.id).await.unwrap();

        assert!(posts.find_blocks(&[post.id]).await.unwrap().is_empty());
        assert!(db.tables.read().await.bookmarks.is_empty());
    }

    #[tokio::test]
    async fn test_bookmark_requires_existing_post() {
        let db = InMemoryDatabase::new();

        let result = db
            .bookmarks()
            .insert(Bookmark::new(Uuid::new_v4(), Uuid::new_v4()))
            .await;

        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_listing_is_newest_first() {
        let db = InMemoryDatabase::new();
        let posts = db.posts();
        let author = Uuid::new_v4();
        let first = Post::new(author, "first".to_string(), true);
        let second = Post::new(author, "second".to_string(), true);

        posts.insert(first.clone()).await.unwrap();
        posts.insert(second.clone()).await.unwrap();

        let listed = posts.find_by_author(author).await.unwrap();
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
    }
}
