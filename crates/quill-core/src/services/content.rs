//! Content block normalization.
//!
//! Turns the client's block array (plus an optional uploaded image) into the
//! canonical ordered sequence stored with a post. Positions are always
//! reassigned to `1..=N` in array order; whatever the client sent is ignored.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::{BlockBody, ContentBlock};
use crate::error::DomainError;
use crate::ports::ObjectStore;

/// An image file attached to a create or update request.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub filename: String,
}

/// Wire shape of a block before validation. Extra fields (`id`, `position`, ...) are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBlock {
    #[serde(rename = "type")]
    kind: String,
    text_content: Option<String>,
    image_url: Option<String>,
}

impl RawBlock {
    fn into_body(self) -> Result<BlockBody, String> {
        match (self.kind.as_str(), self.text_content, self.image_url) {
            ("text", Some(text_content), None) => Ok(BlockBody::Text { text_content }),
            ("image", None, Some(image_url)) => Ok(BlockBody::Image { image_url }),
            ("text", _, _) => Err("a text block must carry textContent and no imageUrl".into()),
            ("image", _, _) => Err("an image block must carry imageUrl and no textContent".into()),
            (other, _, _) => Err(format!("unknown block type `{other}`")),
        }
    }
}

/// Parse a JSON block array, keeping author order.
pub fn parse_blocks(raw: &str) -> Result<Vec<BlockBody>, DomainError> {
    let blocks: Vec<RawBlock> = serde_json::from_str(raw).map_err(|e| {
        DomainError::MalformedContent(format!("content must be a JSON array of blocks: {e}"))
    })?;

    blocks
        .into_iter()
        .enumerate()
        .map(|(index, block)| {
            block
                .into_body()
                .map_err(|reason| DomainError::MalformedContent(format!("block {}: {reason}", index + 1)))
        })
        .collect()
}

/// Attach bodies to `post_id` with positions `1..=N`.
pub fn number_blocks(post_id: Uuid, bodies: Vec<BlockBody>) -> Vec<ContentBlock> {
    bodies
        .into_iter()
        .zip(1..)
        .map(|(body, position)| ContentBlock::new(post_id, body, position))
        .collect()
}

/// Object-store prefix of every image uploaded into `post_id`.
pub fn upload_prefix(owner: Uuid, post_id: Uuid) -> String {
    format!("{owner}/{post_id}/")
}

/// Object-store path for an image uploaded by `owner` into `post_id`.
///
/// `{owner}/{post_id}/{unix millis}-{8 hex chars}-{sanitized filename}`
pub fn object_path(owner: Uuid, post_id: Uuid, filename: &str, now: DateTime<Utc>) -> String {
    let sanitized: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let sanitized = sanitized.trim_matches('.');
    let name = if sanitized.is_empty() { "image" } else { sanitized };

    let nonce = Uuid::new_v4().simple().to_string();
    format!(
        "{}{}-{}-{name}",
        upload_prefix(owner, post_id),
        now.timestamp_millis(),
        &nonce[..8]
    )
}

/// Content Block Normalizer.
pub struct ContentNormalizer {
    store: Arc<dyn ObjectStore>,
}

impl ContentNormalizer {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Produce the canonical block sequence for `post_id`.
    ///
    /// The block array is validated before anything is uploaded. An attached
    /// image is stored first and appended as the last block; if the caller's
    /// database write fails afterwards the blob is left orphaned.
    pub async fn normalize(
        &self,
        post_id: Uuid,
        owner: Uuid,
        raw: &str,
        image: Option<ImageUpload>,
    ) -> Result<Vec<ContentBlock>, DomainError> {
        let mut bodies = parse_blocks(raw)?;

        if let Some(image) = image {
            let url = self.store_image(post_id, owner, image).await?;
            bodies.push(BlockBody::Image { image_url: url });
        }

        Ok(number_blocks(post_id, bodies))
    }

    async fn store_image(
        &self,
        post_id: Uuid,
        owner: Uuid,
        image: ImageUpload,
    ) -> Result<String, DomainError> {
        if !image.content_type.starts_with("image/") {
            return Err(DomainError::MalformedContent(format!(
                "unsupported media type `{}`",
                image.content_type
            )));
        }
        if image.bytes.is_empty() {
            return Err(DomainError::MalformedContent("uploaded image is empty".into()));
        }

        let path = object_path(owner, post_id, &image.filename, Utc::now());
        self.store
            .upload(&path, image.bytes, &image.content_type)
            .await?;
        tracing::debug!(%path, "Stored post image");

        Ok(self.store.public_url(&path))
    }
}
