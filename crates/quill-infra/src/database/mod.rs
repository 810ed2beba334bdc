//! Relational store implementations - PostgreSQL via SeaORM and in-memory fallback.

mod connections;
mod memory;

#[cfg(feature = "postgres")]
mod postgres_base;
#[cfg(feature = "postgres")]
pub mod postgres_repo;

#[cfg(feature = "postgres")]
pub mod entity;

pub use connections::DatabaseConfig;
#[cfg(feature = "postgres")]
pub use connections::connect;
pub use memory::{
    InMemoryBookmarkRepository, InMemoryCredentialRepository, InMemoryDatabase,
    InMemoryPostRepository, InMemoryUserRepository,
};

#[cfg(feature = "postgres")]
pub use postgres_repo::{
    PostgresBookmarkRepository, PostgresCredentialRepository, PostgresPostRepository,
    PostgresUserRepository,
};
