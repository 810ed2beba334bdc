//! # Quill API Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::from_fn, web};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::from_env();

    // Initialize tracing
    telemetry::init_telemetry(&config.telemetry);
    config.warn_insecure_defaults();

    tracing::info!(
        "Starting Quill API Server on {}:{}",
        config.host,
        config.port
    );

    // Build application state
    let state = AppState::new(&config).await;

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(TracingLogger::default())
            .wrap(from_fn(observability::request_id))
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
