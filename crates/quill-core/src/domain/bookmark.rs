use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user's bookmark on a post. Duplicates are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "blogId")]
    pub post_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Bookmark {
    pub fn new(user_id: Uuid, post_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            post_id,
            created_at: Utc::now(),
        }
    }
}
