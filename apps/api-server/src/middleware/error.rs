//! Error handling - every failure becomes a JSON `{"error": ...}` body.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use quill_core::DomainError;
use quill_core::error::RepoError;
use quill_core::ports::AuthError;
use quill_shared::ErrorResponse;

/// Application-level error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Listing and bookmark endpoints report store failures as 400.
    pub fn store_failure_as_bad_request(err: DomainError) -> Self {
        match err {
            DomainError::Store(msg) => {
                tracing::error!("Store failure: {}", msg);
                AppError::BadRequest(msg)
            }
            other => other.into(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Internal(detail) = self {
            tracing::error!("Internal error: {}", detail);
        }

        let status = self.status_code();
        HttpResponse::build(status).json(ErrorResponse::new(status.as_u16(), self.to_string()))
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        let message = err.to_string();
        match err {
            DomainError::NotFound { .. } => AppError::NotFound(message),
            DomainError::Forbidden(_) => AppError::Forbidden(message),
            DomainError::MalformedContent(_) | DomainError::Validation(_) => {
                AppError::BadRequest(message)
            }
            DomainError::Store(_) | DomainError::Upload(_) => AppError::Internal(message),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        DomainError::from(err).into()
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        let message = err.to_string();
        match err {
            AuthError::MissingToken | AuthError::InvalidCredentials => {
                AppError::Unauthorized(message)
            }
            AuthError::InvalidToken(_) => AppError::Forbidden(message),
            AuthError::AccountExists => AppError::BadRequest(message),
            AuthError::HashingError(_) | AuthError::Provider(_) => AppError::Internal(message),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_auth_error_statuses() {
        assert_eq!(
            AppError::from(AuthError::MissingToken).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::from(AuthError::InvalidToken("bad".into())).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::from(AuthError::InvalidCredentials).status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_domain_error_statuses() {
        assert_eq!(
            AppError::from(DomainError::post_not_found(Uuid::new_v4())).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(DomainError::Forbidden("post")).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::from(DomainError::MalformedContent("x".into())).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(DomainError::Store("down".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::store_failure_as_bad_request(DomainError::Store("down".into())).status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
