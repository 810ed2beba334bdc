//! Authentication handlers.

use actix_web::{HttpResponse, web};

use quill_core::domain::User;
use quill_core::ports::{AuthError, BaseRepository};
use quill_shared::dto::{
    AuthResponse, LoginRequest, RegisterRequest, RegisterResponse, UserResponse,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let email = req.email.trim().to_lowercase();
    let username = req.username.trim().to_string();

    // Validate input
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }
    if req.password.len() < 8 {
        return Err(AppError::BadRequest(
            "Password must be at least 8 characters".to_string(),
        ));
    }
    if username.is_empty() {
        return Err(AppError::BadRequest("Username is required".to_string()));
    }

    let user_id = state
        .identity
        .sign_up(&email, &req.password)
        .await
        .map_err(registration_failed)?;

    let user = match state.users.insert(User::new(user_id, email, username)).await {
        Ok(user) => user,
        Err(e) => {
            tracing::error!(%user_id, error = %e, "Profile insert failed, removing account");
            if let Err(cleanup) = state.identity.delete_account(user_id).await {
                tracing::error!(%user_id, error = %cleanup, "Account left without a profile");
            }
            return Err(AppError::BadRequest(format!("Registration failed: {e}")));
        }
    };

    Ok(HttpResponse::Created().json(RegisterResponse {
        user_id: user.id,
        email: user.email,
        username: user.username,
    }))
}

/// Every registration failure is a 400.
fn registration_failed(err: AuthError) -> AppError {
    if matches!(err, AuthError::HashingError(_) | AuthError::Provider(_)) {
        tracing::error!(error = %err, "Account creation failed");
    }
    AppError::BadRequest(err.to_string())
}

/// POST /login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user_id = state.identity.sign_in(&req.email, &req.password).await?;
    let user = state.users.find_by_id(user_id).await?.ok_or_else(|| {
        AppError::Internal(format!("account {user_id} has no user profile"))
    })?;

    let token = state.tokens.issue(user.id, &user.email)?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.expiration_seconds().max(0) as u64,
        user: user.into(),
    }))
}

/// GET /me - Protected route
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No profile for {}", identity.email)))?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}
