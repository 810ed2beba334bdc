//! Liveness endpoint.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: &'static str,
    pub objects: &'static str,
    pub timestamp: String,
}

/// GET /health - also reports whether the in-memory fallbacks are active.
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        database: state.backends.database,
        objects: state.backends.objects,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
