//! Blob storage port.

use async_trait::async_trait;

/// Object store holding uploaded post images.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` at `path`.
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str)
    -> Result<(), StorageError>;

    /// Remove the object at `path`.
    async fn delete(&self, path: &str) -> Result<(), StorageError>;

    /// Public URL under which `path` is served.
    fn public_url(&self, path: &str) -> String;

    /// Inverse of [`ObjectStore::public_url`]; `None` for URLs this store did not issue.
    fn path_from_public_url(&self, url: &str) -> Option<String>;
}

/// Object store errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("upload of {path} failed: {reason}")]
    Upload { path: String, reason: String },

    #[error("delete of {path} failed: {reason}")]
    Delete { path: String, reason: String },
}
