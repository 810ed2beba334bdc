use std::time::Duration;

#[cfg(feature = "postgres")]
use sea_orm::{ConnectOptions, Database, DbConn, DbErr};

/// Configuration for the relational store.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 100,
            min_connections: 10,
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Open the connection pool.
///
/// # Example
/// ```ignore
/// let db = connect(&DatabaseConfig::new("postgres://localhost/quill")).await?;
/// let posts = PostgresPostRepository::new(db.clone());
/// ```
#[cfg(feature = "postgres")]
pub async fn connect(config: &DatabaseConfig) -> Result<DbConn, DbErr> {
    tracing::info!("Initializing database connection...");

    let opts = ConnectOptions::new(&config.url)
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(config.connect_timeout)
        .idle_timeout(Duration::from_secs(300))
        .sqlx_logging(true)
        .to_owned();

    let db = Database::connect(opts).await?;
    tracing::info!("Database connected (pool: {})", config.max_connections);

    Ok(db)
}
