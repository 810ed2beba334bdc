use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload of a content block - exactly one of text or image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BlockBody {
    Text {
        #[serde(rename = "textContent")]
        text_content: String,
    },
    Image {
        #[serde(rename = "imageUrl")]
        image_url: String,
    },
}

impl BlockBody {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text_content: text.into(),
        }
    }

    pub fn image(url: impl Into<String>) -> Self {
        Self::Image {
            image_url: url.into(),
        }
    }

    /// Discriminator as stored in the `block_type` column.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Image { .. } => "image",
        }
    }

    pub fn text_content(&self) -> Option<&str> {
        match self {
            Self::Text { text_content } => Some(text_content),
            Self::Image { .. } => None,
        }
    }

    pub fn image_url(&self) -> Option<&str> {
        match self {
            Self::Image { image_url } => Some(image_url),
            Self::Text { .. } => None,
        }
    }
}

/// One ordered unit of a post's body.
///
/// Within a post, positions run `1..=N` without gaps or duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentBlock {
    pub id: Uuid,
    pub post_id: Uuid,
    #[serde(flatten)]
    pub body: BlockBody,
    pub position: i32,
}

impl ContentBlock {
    pub fn new(post_id: Uuid, body: BlockBody, position: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            body,
            position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_block_serializes_without_image_field() {
        let block = ContentBlock::new(Uuid::new_v4(), BlockBody::text("hi"), 1);
        let json = serde_json::to_value(&block).unwrap();

        assert_eq!(json["type"], "text");
        assert_eq!(json["textContent"], "hi");
        assert_eq!(json["position"], 1);
        assert!(json.get("imageUrl").is_none());
    }

    #[test]
    fn test_image_block_accessors() {
        let body = BlockBody::image("https://cdn.test/a.png");

        assert_eq!(body.kind(), "image");
        assert_eq!(body.image_url(), Some("https://cdn.test/a.png"));
        assert_eq!(body.text_content(), None);
    }
}
