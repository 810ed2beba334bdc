use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Password credential held by the local identity provider.
#[derive(Debug, Clone)]
pub struct Credential {
    pub user_id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl Credential {
    /// Create a credential for a freshly generated user id.
    pub fn new(email: String, password_hash: String) -> Self {
        Self {
            user_id: Uuid::new_v4(),
            email,
            password_hash,
            created_at: Utc::now(),
        }
    }
}
