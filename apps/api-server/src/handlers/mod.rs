//! HTTP handlers and route configuration.

mod auth;
mod bookmarks;
mod form;
mod health;
mod posts;
mod uploads;


use actix_web::web;

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| AppError::NotFound(err.to_string()).into()),
    )
    // Public routes
    .route("/health", web::get().to(health::health_check))
    // Auth routes
    .route("/register", web::post().to(auth::register))
    .route("/login", web::post().to(auth::login))
    .route("/me", web::get().to(auth::me))
    // Posts
    .route("/blogs", web::get().to(posts::list_published))
    .route("/blogs", web::post().to(posts::create_post))
    .route("/blogs/{id}", web::get().to(posts::get_post))
    .route("/blogs/{id}", web::put().to(posts::update_post))
    .route("/blogs/{id}", web::delete().to(posts::delete_post))
    .route("/myblogs", web::get().to(posts::list_mine))
    // Bookmarks
    .route("/bookmarks", web::post().to(bookmarks::add_bookmark))
    .route("/bookmarks", web::get().to(bookmarks::list_bookmarks))
    .route("/bookmarks/{id}", web::delete().to(bookmarks::remove_bookmark))
    // In-memory image fallback
    .route("/uploads/{path:.*}", web::get().to(uploads::serve_upload));
}
