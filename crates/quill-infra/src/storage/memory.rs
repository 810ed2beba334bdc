//! In-memory object store - used when no storage service is configured.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use quill_core::ports::{ObjectStore, StorageError};

struct StoredObject {
    content_type: String,
    bytes: Vec<u8>,
}

/// Keeps blobs in a HashMap behind an async RwLock.
///
/// Note: Data is lost on process restart.
pub struct InMemoryObjectStore {
    base_url: String,
    objects: RwLock<HashMap<String, StoredObject>>,
}

impl InMemoryObjectStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    pub async fn contains(&self, path: &str) -> bool {
        self.objects.read().await.contains_key(path)
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Content type and bytes of a stored object.
    pub async fn fetch(&self, path: &str) -> Option<(String, Vec<u8>)> {
        self.objects
            .read()
            .await
            .get(path)
            .map(|object| (object.content_type.clone(), object.bytes.clone()))
    }

    /// Content type and size of a stored object.
    pub async fn describe(&self, path: &str) -> Option<(String, usize)> {
        self.objects
            .read()
            .await
            .get(path)
            .map(|object| (object.content_type.clone(), object.bytes.len()))
    }
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new("http://localhost:8080/uploads")
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let mut objects = self.objects.write().await;
        if objects.contains_key(path) {
            return Err(StorageError::Upload {
                path: path.to_string(),
                reason: "object already exists".to_string(),
            });
        }

        objects.insert(
            path.to_string(),
            StoredObject {
                content_type: content_type.to_string(),
                bytes,
            },
        );
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        match self.objects.write().await.remove(path) {
            Some(_) => Ok(()),
            None => Err(StorageError::Delete {
                path: path.to_string(),
                reason: "no such object".to_string(),
            }),
        }
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn path_from_public_url(&self, url: &str) -> Option<String> {
        url.strip_prefix(&self.base_url)?
            .strip_prefix('/')
            .filter(|path| !path.is_empty())
            .map(String::from)
    }
}
