//! Supabase Storage REST client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};

use quill_core::ports::{ObjectStore, StorageError};

/// Connection settings for a Supabase-compatible storage service.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Project URL, e.g. `https://abc.supabase.co`.
    pub url: String,
    pub service_key: String,
    pub bucket: String,
}

/// Object store backed by the Supabase Storage API.
///
/// Objects live in one public bucket and are served from
/// `{url}/storage/v1/object/public/{bucket}/{path}`.
pub struct SupabaseObjectStore {
    client: reqwest::Client,
    config: StorageConfig,
    public_prefix: String,
}

impl SupabaseObjectStore {
    pub fn new(config: &StorageConfig) -> Result<Self, StorageError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| StorageError::Upload {
                path: String::new(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        let url = config.url.trim_end_matches('/');
        let public_prefix = format!("{url}/storage/v1/object/public/{}/", config.bucket);

        Ok(Self {
            client,
            config: StorageConfig {
                url: url.to_string(),
                ..config.clone()
            },
            public_prefix,
        })
    }

    fn object_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.config.url, self.config.bucket, path
        )
    }

    fn bucket_url(&self) -> String {
        format!("{}/storage/v1/object/{}", self.config.url, self.config.bucket)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header(AUTHORIZATION, format!("Bearer {}", self.config.service_key))
            .header("apikey", &self.config.service_key)
    }
}

/// Error text from a non-success response.
async fn failure_reason(response: reqwest::Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    format!("{status}: {body}")
}

#[async_trait]
impl ObjectStore for SupabaseObjectStore {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let upload_error = |reason: String| StorageError::Upload {
            path: path.to_string(),
            reason,
        };

        let response = self
            .authorized(self.client.post(self.object_url(path)))
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await
            .map_err(|e| upload_error(e.to_string()))?;

        if !response.status().is_success() {
            return Err(upload_error(failure_reason(response).await));
        }

        tracing::debug!(%path, "Uploaded object");
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        let delete_error = |reason: String| StorageError::Delete {
            path: path.to_string(),
            reason,
        };

        let response = self
            .authorized(self.client.delete(self.bucket_url()))
            .json(&serde_json::json!({ "prefixes": [path] }))
            .send()
            .await
            .map_err(|e| delete_error(e.to_string()))?;

        if !response.status().is_success() {
            return Err(delete_error(failure_reason(response).await));
        }

        tracing::debug!(%path, "Deleted object");
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}{}", self.public_prefix, path)
    }

    fn path_from_public_url(&self, url: &str) -> Option<String> {
        url.strip_prefix(&self.public_prefix)
            .filter(|path| !path.is_empty())
            .map(String::from)
    }
}
