//! Authorization gate - bearer token extractors.
//!
//! No header is `401 MissingToken`; a header that does not verify is
//! `403 InvalidToken`. Both fail before the handler body runs.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use std::future::{Ready, ready};
use uuid::Uuid;

use quill_core::ports::{AuthError, TokenClaims};

use crate::middleware::error::AppError;
use crate::state::AppState;

/// Authenticated user identity extractor.
///
/// Use this in handlers to require authentication:
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, user {}!", identity.user_id)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: String,
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.email,
        }
    }
}

/// Pull the token out of an `Authorization` header value.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let value = header.ok_or(AuthError::MissingToken)?;
    let token = value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidToken("expected a Bearer token".to_string()))?
        .trim();

    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}

fn authenticate(req: &HttpRequest) -> Result<Identity, AppError> {
    let state = req.app_data::<web::Data<AppState>>().ok_or_else(|| {
        tracing::error!("AppState not found in app data");
        AppError::Internal("Server configuration error".to_string())
    })?;

    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .map(|value| {
            value
                .to_str()
                .map_err(|_| AuthError::InvalidToken("invalid authorization header".to_string()))
        })
        .transpose()?;

    let token = bearer_token(header)?;
    let claims = state.tokens.verify(token)?;
    Ok(Identity::from(claims))
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

/// Optional identity extractor - a missing or bad token means anonymous.
pub struct OptionalIdentity(pub Option<Identity>);

impl OptionalIdentity {
    pub fn user_id(&self) -> Option<Uuid> {
        self.0.as_ref().map(|identity| identity.user_id)
    }
}

impl FromRequest for OptionalIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(OptionalIdentity(authenticate(req).ok())))
    }
}
