use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User profile row, keyed by the id the identity provider issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(id: Uuid, email: String, username: String) -> Self {
        Self {
            id,
            email,
            username,
            created_at: Utc::now(),
        }
    }
}
