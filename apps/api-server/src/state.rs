//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{
    BookmarkRepository, CredentialRepository, IdentityProvider, ObjectStore, PostRepository,
    TokenService, UserRepository,
};
use quill_core::services::{BookmarkService, PostService};
use quill_infra::{
    Argon2PasswordService, InMemoryDatabase, InMemoryObjectStore, JwtTokenService,
    PasswordIdentityProvider, SupabaseObjectStore,
};

#[cfg(feature = "postgres")]
use quill_infra::database::{
    PostgresBookmarkRepository, PostgresCredentialRepository, PostgresPostRepository,
    PostgresUserRepository, connect,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<dyn TokenService>,
    pub identity: Arc<dyn IdentityProvider>,
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<PostService>,
    pub bookmarks: Arc<BookmarkService>,
    pub max_upload_bytes: usize,
    pub backends: Backends,
    /// Set when images live in process memory and are served by `/uploads`.
    pub uploads: Option<Arc<InMemoryObjectStore>>,
}

/// Which adapters are serving the relational and object stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backends {
    pub database: &'static str,
    pub objects: &'static str,
}

/// Relational store adapters.
struct Repositories {
    backend: &'static str,
    users: Arc<dyn UserRepository>,
    credentials: Arc<dyn CredentialRepository>,
    posts: Arc<dyn PostRepository>,
    bookmarks: Arc<dyn BookmarkRepository>,
}

impl Repositories {
    fn in_memory() -> Self {
        let db = InMemoryDatabase::new();
        Self {
            backend: "memory",
            users: Arc::new(db.users()),
            credentials: Arc::new(db.credentials()),
            posts: Arc::new(db.posts()),
            bookmarks: Arc::new(db.bookmarks()),
        }
    }

    #[cfg(feature = "postgres")]
    async fn from_config(config: &AppConfig) -> Self {
        let Some(db_config) = config.database.as_ref() else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Self::in_memory();
        };

        match connect(db_config).await {
            Ok(conn) => Self {
                backend: "postgres",
                users: Arc::new(PostgresUserRepository::new(conn.clone())),
                credentials: Arc::new(PostgresCredentialRepository::new(conn.clone())),
                posts: Arc::new(PostgresPostRepository::new(conn.clone())),
                bookmarks: Arc::new(PostgresBookmarkRepository::new(conn)),
            },
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                Self::in_memory()
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn from_config(_config: &AppConfig) -> Self {
        tracing::info!("Running without postgres feature - using in-memory repositories");
        Self::in_memory()
    }
}

/// The configured remote object store, if any.
fn remote_object_store(config: &AppConfig) -> Option<Arc<dyn ObjectStore>> {
    let storage = config.storage.as_ref()?;
    match SupabaseObjectStore::new(storage) {
        Ok(store) => {
            tracing::info!(bucket = %storage.bucket, "Object storage configured");
            Some(Arc::new(store))
        }
        Err(e) => {
            tracing::error!("Failed to set up object storage: {}. Using in-memory fallback.", e);
            None
        }
    }
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let repos = Repositories::from_config(config).await;
        let state = Self::assemble(config, repos, remote_object_store(config));
        tracing::info!(
            database = state.backends.database,
            objects = state.backends.objects,
            "Application state initialized"
        );
        state
    }

    /// State backed entirely by in-memory adapters.
    pub fn in_memory(config: &AppConfig) -> Self {
        Self::assemble(config, Repositories::in_memory(), None)
    }

    fn assemble(
        config: &AppConfig,
        repos: Repositories,
        remote: Option<Arc<dyn ObjectStore>>,
    ) -> Self {
        let (store, uploads, objects) = match remote {
            Some(store) => (store, None, "supabase"),
            None => {
                let memory = Arc::new(InMemoryObjectStore::new(config.public_upload_url.clone()));
                let store: Arc<dyn ObjectStore> = memory.clone();
                (store, Some(memory), "memory")
            }
        };

        let identity = PasswordIdentityProvider::new(
            repos.credentials,
            Arc::new(Argon2PasswordService::new()),
        );

        Self {
            tokens: Arc::new(JwtTokenService::new(&config.jwt)),
            identity: Arc::new(identity),
            posts: Arc::new(PostService::new(
                repos.posts.clone(),
                repos.users.clone(),
                store,
            )),
            bookmarks: Arc::new(BookmarkService::new(repos.bookmarks, repos.posts)),
            users: repos.users,
            max_upload_bytes: config.max_upload_bytes,
            backends: Backends {
                database: repos.backend,
                objects,
            },
            uploads,
        }
    }
}
