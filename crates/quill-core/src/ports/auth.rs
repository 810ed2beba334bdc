//! Authentication ports.

use async_trait::async_trait;
use uuid::Uuid;

/// Identity carried inside a bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub user_id: Uuid,
    pub email: String,
    pub exp: i64,
}

/// Token service trait for signed bearer tokens.
pub trait TokenService: Send + Sync {
    /// Issue a time-limited token for a user.
    fn issue(&self, user_id: Uuid, email: &str) -> Result<String, AuthError>;

    /// Validate and decode a token. Bad signatures and expired tokens are `InvalidToken`.
    fn verify(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Token lifetime in seconds.
    fn expiration_seconds(&self) -> i64;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Account creation and credential checks.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an account and return its user id.
    async fn sign_up(&self, email: &str, password: &str) -> Result<Uuid, AuthError>;

    /// Check a password and return the account's user id.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Uuid, AuthError>;

    /// Remove an account so its email can register again.
    async fn delete_account(&self, user_id: Uuid) -> Result<(), AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("An account with this email already exists")]
    AccountExists,

    #[error("Hashing error: {0}")]
    HashingError(String),

    #[error("Identity provider error: {0}")]
    Provider(String),
}
