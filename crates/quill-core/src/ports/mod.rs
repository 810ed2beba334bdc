//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod object_store;
mod repository;

pub use auth::{AuthError, IdentityProvider, PasswordService, TokenClaims, TokenService};
pub use object_store::{ObjectStore, StorageError};
pub use repository::{
    BaseRepository, BookmarkRepository, CredentialRepository, PostRepository, UserRepository,
};
