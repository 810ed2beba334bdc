//! Post Aggregate Manager.
//!
//! A post and its ordered content blocks are read and written as one unit.
//! Ownership is checked before anything is uploaded or written.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{AuthorSummary, ContentBlock, Post, PostAggregate, PostDraft};
use crate::error::{DomainError, RepoError};
use crate::ports::{BaseRepository, ObjectStore, PostRepository, UserRepository};

use super::content::{ContentNormalizer, ImageUpload, upload_prefix};

pub struct PostService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
    store: Arc<dyn ObjectStore>,
    normalizer: ContentNormalizer,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            posts,
            users,
            normalizer: ContentNormalizer::new(store.clone()),
            store,
        }
    }

    /// Create a post with its first block set.
    pub async fn create(
        &self,
        author_id: Uuid,
        draft: PostDraft,
        image: Option<ImageUpload>,
    ) -> Result<PostAggregate, DomainError> {
        let title = validate_title(&draft.title)?;
        let post = Post::new(author_id, title, draft.published);

        let blocks = self
            .normalizer
            .normalize(post.id, author_id, &draft.content, image)
            .await?;

        self.posts
            .insert_with_blocks(post.clone(), blocks.clone())
            .await?;
        tracing::info!(post_id = %post.id, blocks = blocks.len(), "Post created");

        Ok(PostAggregate {
            author: self.author_summary(author_id).await?,
            post,
            content: blocks,
        })
    }

    /// Fetch one post. Drafts are reported as missing to everyone but their author.
    pub async fn get(
        &self,
        post_id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<PostAggregate, DomainError> {
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .filter(|post| post.is_visible_to(viewer))
            .ok_or_else(|| DomainError::post_not_found(post_id))?;

        self.assemble(vec![post])
            .await?
            .pop()
            .ok_or_else(|| DomainError::post_not_found(post_id))
    }

    /// All published posts, newest first.
    pub async fn list_published(&self) -> Result<Vec<PostAggregate>, DomainError> {
        let posts = self.posts.find_published().await?;
        self.assemble(posts).await
    }

    /// Every post by `author_id`, drafts included, newest first.
    pub async fn list_owned_by(&self, author_id: Uuid) -> Result<Vec<PostAggregate>, DomainError> {
        let posts = self.posts.find_by_author(author_id).await?;
        self.assemble(posts).await
    }

    /// Replace title, published flag and the whole block set of an owned post.
    pub async fn update(
        &self,
        post_id: Uuid,
        acting_user: Uuid,
        draft: PostDraft,
        image: Option<ImageUpload>,
    ) -> Result<PostAggregate, DomainError> {
        let existing = self.load_owned(post_id, acting_user).await?;
        let title = validate_title(&draft.title)?;
        let previous = self.posts.find_blocks(&[post_id]).await?;

        let blocks = self
            .normalizer
            .normalize(post_id, acting_user, &draft.content, image)
            .await?;

        let post = Post {
            title,
            published: draft.published,
            ..existing
        };
        self.posts
            .replace_with_blocks(post.clone(), blocks.clone())
            .await?;
        tracing::info!(%post_id, blocks = blocks.len(), "Post updated");

        self.discard_superseded_images(&post, &previous, &blocks).await;

        Ok(PostAggregate {
            author: self.author_summary(post.author_id).await?,
            post,
            content: blocks,
        })
    }

    /// Delete an owned post, then best-effort the images it uploaded.
    pub async fn delete(&self, post_id: Uuid, acting_user: Uuid) -> Result<(), DomainError> {
        let post = self.load_owned(post_id, acting_user).await?;
        let blocks = self.posts.find_blocks(&[post_id]).await?;

        self.posts.delete(post_id).await.map_err(|e| match e {
            // Removed by a concurrent request since `load_owned`.
            RepoError::NotFound => DomainError::post_not_found(post_id),
            other => other.into(),
        })?;
        tracing::info!(%post_id, "Post deleted");

        for url in blocks.iter().filter_map(|block| block.body.image_url()) {
            self.discard_image(&post, url).await;
        }
        Ok(())
    }

    async fn load_owned(&self, post_id: Uuid, acting_user: Uuid) -> Result<Post, DomainError> {
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(post_id))?;

        if !post.is_owned_by(acting_user) {
            tracing::warn!(%post_id, user_id = %acting_user, "Rejected change to foreign post");
            return Err(DomainError::Forbidden("post"));
        }
        Ok(post)
    }

    async fn author_summary(&self, author_id: Uuid) -> Result<Option<AuthorSummary>, DomainError> {
        let author = self.users.find_by_id(author_id).await?;
        Ok(author.map(|user| AuthorSummary {
            id: user.id,
            username: user.username,
        }))
    }

    /// Join posts with their blocks and author summaries, keeping the posts' order.
    async fn assemble(&self, posts: Vec<Post>) -> Result<Vec<PostAggregate>, DomainError> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let post_ids: Vec<Uuid> = posts.iter().map(|post| post.id).collect();
        let mut blocks_by_post: HashMap<Uuid, Vec<ContentBlock>> = HashMap::new();
        for block in self.posts.find_blocks(&post_ids).await? {
            blocks_by_post.entry(block.post_id).or_default().push(block);
        }

        let author_ids: Vec<Uuid> = posts
            .iter()
            .map(|post| post.author_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let authors: HashMap<Uuid, AuthorSummary> = self
            .users
            .find_by_ids(&author_ids)
            .await?
            .into_iter()
            .map(|user| {
                (
                    user.id,
                    AuthorSummary {
                        id: user.id,
                        username: user.username,
                    },
                )
            })
            .collect();

        Ok(posts
            .into_iter()
            .map(|post| {
                let mut content = blocks_by_post.remove(&post.id).unwrap_or_default();
                content.sort_by_key(|block| block.position);
                PostAggregate {
                    author: authors.get(&post.author_id).cloned(),
                    post,
                    content,
                }
            })
            .collect())
    }

    async fn discard_superseded_images(
        &self,
        post: &Post,
        previous: &[ContentBlock],
        current: &[ContentBlock],
    ) {
        let kept: HashSet<&str> = current
            .iter()
            .filter_map(|block| block.body.image_url())
            .collect();

        for url in previous.iter().filter_map(|block| block.body.image_url()) {
            if !kept.contains(url) {
                self.discard_image(post, url).await;
            }
        }
    }

    /// Delete a blob this post uploaded. Any other URL, including another
    /// post's image pasted into the block array, is left alone. Failures are
    /// logged and swallowed; the row change has already happened.
    async fn discard_image(&self, post: &Post, url: &str) {
        let Some(path) = self.store.path_from_public_url(url) else {
            tracing::debug!(%url, "Image not managed by the object store, skipping delete");
            return;
        };
        if !path.starts_with(&upload_prefix(post.author_id, post.id)) {
            tracing::debug!(post_id = %post.id, %path, "Image not uploaded by this post, skipping delete");
            return;
        }

        if let Err(e) = self.store.delete(&path).await {
            tracing::warn!(%path, error = %e, "Failed to delete image blob");
        }
    }
}

fn validate_title(title: &str) -> Result<String, DomainError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(DomainError::Validation("title must not be empty".into()));
    }
    Ok(title.to_string())
}
