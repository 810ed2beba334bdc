use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ContentBlock;

/// Post entity - the header row of a blog post.
///
/// `author_id` never changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub author_id: Uuid,
    pub published: bool,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post.
    pub fn new(author_id: Uuid, title: String, published: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            author_id,
            published,
            created_at: Utc::now(),
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }

    /// Whether `viewer` may read this post: published posts are public, drafts are author-only.
    pub fn is_visible_to(&self, viewer: Option<Uuid>) -> bool {
        self.published || viewer.is_some_and(|id| self.is_owned_by(id))
    }
}

/// Author fields embedded in a post response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: Uuid,
    pub username: String,
}

/// A post together with its ordered content blocks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostAggregate {
    #[serde(flatten)]
    pub post: Post,
    pub author: Option<AuthorSummary>,
    pub content: Vec<ContentBlock>,
}

impl PostAggregate {
    /// Image URLs referenced by this post's blocks.
    pub fn image_urls(&self) -> impl Iterator<Item = &str> {
        self.content.iter().filter_map(|block| block.body.image_url())
    }
}

/// Client-supplied fields for create and update.
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub title: String,
    pub published: bool,
    /// JSON-encoded block array in author order.
    pub content: String,
}
