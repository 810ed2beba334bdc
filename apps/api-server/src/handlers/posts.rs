//! Blog post handlers.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_shared::dto::{BlogListResponse, DeleteBlogResponse};

use super::form::PostForm;
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /blogs
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let form = PostForm::from_multipart(payload, state.max_upload_bytes).await?;
    let post = state
        .posts
        .create(identity.user_id, form.draft, form.image)
        .await?;

    Ok(HttpResponse::Created().json(post))
}

/// GET /blogs/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state.posts.get(path.into_inner(), viewer.user_id()).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// GET /blogs
pub async fn list_published(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let blogs = state
        .posts
        .list_published()
        .await
        .map_err(AppError::store_failure_as_bad_request)?;

    Ok(HttpResponse::Ok().json(BlogListResponse { blogs }))
}

/// GET /myblogs
pub async fn list_mine(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let blogs = state.posts.list_owned_by(identity.user_id).await?;
    Ok(HttpResponse::Ok().json(BlogListResponse { blogs }))
}

/// PUT /blogs/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let form = PostForm::from_multipart(payload, state.max_upload_bytes).await?;
    let post = state
        .posts
        .update(post_id, identity.user_id, form.draft, form.image)
        .await?;

    Ok(HttpResponse::Ok().json(post))
}

/// DELETE /blogs/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    state.posts.delete(post_id, identity.user_id).await?;

    Ok(HttpResponse::Ok().json(DeleteBlogResponse {
        message: "Blog deleted successfully".to_string(),
        blog_id: post_id,
    }))
}
