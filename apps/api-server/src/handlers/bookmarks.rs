//! Bookmark handlers. Store failures surface as 400 here.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_shared::dto::{BookmarkListResponse, BookmarkRequest, MessageResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /bookmarks
pub async fn add_bookmark(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<BookmarkRequest>,
) -> AppResult<HttpResponse> {
    state
        .bookmarks
        .add(identity.user_id, body.blog_id)
        .await
        .map_err(AppError::store_failure_as_bad_request)?;

    Ok(HttpResponse::Created().json(MessageResponse::new("Blog bookmarked successfully")))
}

/// GET /bookmarks
pub async fn list_bookmarks(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let bookmarks = state
        .bookmarks
        .list(identity.user_id)
        .await
        .map_err(AppError::store_failure_as_bad_request)?;

    Ok(HttpResponse::Ok().json(BookmarkListResponse { bookmarks }))
}

/// DELETE /bookmarks/{id}
pub async fn remove_bookmark(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .bookmarks
        .remove(path.into_inner(), identity.user_id)
        .await
        .map_err(AppError::store_failure_as_bad_request)?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Bookmark removed successfully")))
}
