//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`.
//! This crate contains the database, object storage, and authentication integrations.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL repositories via SeaORM
//! - `minimal` - In-memory repositories only

pub mod auth;
pub mod database;
pub mod storage;

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService, PasswordIdentityProvider};
pub use database::{DatabaseConfig, InMemoryDatabase};
pub use storage::{InMemoryObjectStore, StorageConfig, SupabaseObjectStore};

/// Mask an email for logging to avoid PII in logs.
pub fn mask_email(email: &str) -> String {
    match email.find('@') {
        Some(at_pos) => {
            let (local, domain) = email.split_at(at_pos);
            let masked_local = match local.chars().next() {
                Some(first) if local.len() > 1 => format!("{first}***"),
                _ => "***".to_string(),
            };
            format!("{masked_local}{domain}")
        }
        None => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::mask_email;

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("alice@example.com"), "a***@example.com");
        assert_eq!(mask_email("a@example.com"), "***@example.com");
        assert_eq!(mask_email("not-an-email"), "***");
    }
}
