//! Multipart form decoding for post create/update.

use actix_multipart::{Field, Multipart, MultipartError};
use futures::TryStreamExt;

use quill_core::domain::PostDraft;
use quill_core::services::ImageUpload;

use crate::middleware::error::AppError;

/// Upper bound for the text fields of the form.
const MAX_TEXT_FIELD_BYTES: usize = 1024 * 1024;

/// Decoded `title`, `content`, `publish` and optional `image` fields.
pub struct PostForm {
    pub draft: PostDraft,
    pub image: Option<ImageUpload>,
}

fn multipart_error(err: MultipartError) -> AppError {
    AppError::BadRequest(format!("Invalid multipart body: {err}"))
}

async fn read_field(field: &mut Field, limit: usize) -> Result<Vec<u8>, AppError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(multipart_error)? {
        if bytes.len() + chunk.len() > limit {
            return Err(AppError::BadRequest(format!(
                "Field `{}` exceeds {limit} bytes",
                field.name().unwrap_or_default()
            )));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

async fn read_text(field: &mut Field) -> Result<String, AppError> {
    let bytes = read_field(field, MAX_TEXT_FIELD_BYTES).await?;
    String::from_utf8(bytes).map_err(|_| AppError::BadRequest("Form fields must be UTF-8".into()))
}

/// Parse the `publish` checkbox value.
pub fn parse_flag(value: &str) -> Result<bool, AppError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Ok(true),
        "false" | "0" | "off" | "no" | "" => Ok(false),
        other => Err(AppError::BadRequest(format!("Invalid publish flag `{other}`"))),
    }
}

impl PostForm {
    pub async fn from_multipart(mut payload: Multipart, max_image_bytes: usize) -> Result<Self, AppError> {
        let mut title = None;
        let mut content = None;
        let mut published = false;
        let mut image = None;

        while let Some(mut field) = payload.try_next().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "title" => title = Some(read_text(&mut field).await?),
                "content" => content = Some(read_text(&mut field).await?),
                "publish" | "published" => published = parse_flag(&read_text(&mut field).await?)?,
                "image" => {
                    let filename = field
                        .content_disposition()
                        .and_then(|cd| cd.get_filename())
                        .unwrap_or("image")
                        .to_string();
                    let content_type = field
                        .content_type()
                        .map(|mime| mime.essence_str().to_string())
                        .unwrap_or_else(|| "application/octet-stream".to_string());
                    let bytes = read_field(&mut field, max_image_bytes).await?;

                    // Browsers send an empty part when no file was picked.
                    if !bytes.is_empty() {
                        image = Some(ImageUpload {
                            bytes,
                            content_type,
                            filename,
                        });
                    }
                }
                other => {
                    tracing::debug!(field = %other, "Ignoring unknown form field");
                    read_field(&mut field, MAX_TEXT_FIELD_BYTES).await?;
                }
            }
        }

        let title = title.ok_or_else(|| AppError::BadRequest("Title is required".to_string()))?;

        Ok(Self {
            draft: PostDraft {
                title,
                published,
                content: content.unwrap_or_else(|| "[]".to_string()),
            },
            image,
        })
    }
}
