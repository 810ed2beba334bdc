//! Images held by the in-memory object store.

use actix_web::{HttpResponse, web};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /uploads/{path}
pub async fn serve_upload(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let path = path.into_inner();
    let object = match state.uploads.as_ref() {
        Some(store) => store.fetch(&path).await,
        None => None,
    };
    let (content_type, bytes) =
        object.ok_or_else(|| AppError::NotFound(format!("No upload at {path}")))?;

    Ok(HttpResponse::Ok().content_type(content_type).body(bytes))
}
