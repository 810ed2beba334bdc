//! Authentication implementations.

mod identity;
mod jwt;
mod password;

pub use identity::PasswordIdentityProvider;
pub use jwt::{DEFAULT_JWT_SECRET, JwtConfig, JwtTokenService};
pub use password::Argon2PasswordService;
