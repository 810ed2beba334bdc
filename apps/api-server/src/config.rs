//! Application configuration loaded from environment variables.
//!
//! Built once in `main` and passed by reference to whatever needs it.

use std::env;
use std::str::FromStr;

use quill_infra::auth::DEFAULT_JWT_SECRET;
use quill_infra::{DatabaseConfig, JwtConfig, StorageConfig};

use crate::telemetry::TelemetryConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub storage: Option<StorageConfig>,
    /// Public base URL of the in-memory object store, served under `/uploads`.
    pub public_upload_url: String,
    pub max_upload_bytes: usize,
    pub production: bool,
    pub telemetry: TelemetryConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database: None,
            jwt: JwtConfig::default(),
            storage: None,
            public_upload_url: "http://127.0.0.1:8080/uploads".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
            production: false,
            telemetry: TelemetryConfig::default(),
        }
    }
}

fn parsed<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let database = env::var("DATABASE_URL").ok().map(|url| {
            let mut config = DatabaseConfig::new(url);
            config.max_connections = parsed("DB_MAX_CONNECTIONS").unwrap_or(100);
            config.min_connections = parsed("DB_MIN_CONNECTIONS").unwrap_or(10);
            config
        });

        let jwt = JwtConfig {
            secret: env::var("JWT_SECRET").unwrap_or(defaults.jwt.secret),
            expiration_hours: parsed("JWT_EXPIRATION_HOURS").unwrap_or(defaults.jwt.expiration_hours),
            issuer: env::var("JWT_ISSUER").unwrap_or(defaults.jwt.issuer),
        };

        let storage = match (
            env::var("STORAGE_URL"),
            env::var("STORAGE_SERVICE_KEY"),
            env::var("STORAGE_BUCKET"),
        ) {
            (Ok(url), Ok(service_key), Ok(bucket)) => Some(StorageConfig {
                url,
                service_key,
                bucket,
            }),
            _ => None,
        };

        let host = env::var("HOST").unwrap_or(defaults.host);
        let port = parsed("PORT").unwrap_or(defaults.port);

        Self {
            public_upload_url: env::var("STORAGE_PUBLIC_BASE_URL")
                .unwrap_or_else(|_| format!("http://{host}:{port}/uploads")),
            max_upload_bytes: parsed("MAX_UPLOAD_BYTES").unwrap_or(defaults.max_upload_bytes),
            production: env::var("RUST_ENV")
                .map(|v| v == "production" || v == "prod")
                .unwrap_or(false),
            telemetry: TelemetryConfig::from_env(),
            host,
            port,
            database,
            jwt,
            storage,
        }
    }

    /// Log about settings that are fine for development only. Call after telemetry is up.
    pub fn warn_insecure_defaults(&self) {
        if self.jwt.secret == DEFAULT_JWT_SECRET {
            if self.production {
                tracing::error!(
                    "SECURITY: Using default JWT secret in production! Set JWT_SECRET environment variable."
                );
            } else {
                tracing::warn!("Using default JWT secret. Set JWT_SECRET for production use.");
            }
        }
        if self.storage.is_none() {
            tracing::warn!("STORAGE_URL not set. Uploaded images are kept in memory.");
        }
    }
}
