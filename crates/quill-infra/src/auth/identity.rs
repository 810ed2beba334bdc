//! Local identity provider: Argon2 credentials in the relational store.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use quill_core::domain::Credential;
use quill_core::error::RepoError;
use quill_core::ports::{
    AuthError, BaseRepository, CredentialRepository, IdentityProvider, PasswordService,
};

use crate::mask_email;

pub struct PasswordIdentityProvider {
    credentials: Arc<dyn CredentialRepository>,
    passwords: Arc<dyn PasswordService>,
}

impl PasswordIdentityProvider {
    pub fn new(
        credentials: Arc<dyn CredentialRepository>,
        passwords: Arc<dyn PasswordService>,
    ) -> Self {
        Self {
            credentials,
            passwords,
        }
    }
}

fn provider_error(err: RepoError) -> AuthError {
    match err {
        RepoError::Constraint(_) => AuthError::AccountExists,
        other => AuthError::Provider(other.to_string()),
    }
}

#[async_trait]
impl IdentityProvider for PasswordIdentityProvider {
    async fn sign_up(&self, email: &str, password: &str) -> Result<Uuid, AuthError> {
        let email = email.trim().to_lowercase();
        if self
            .credentials
            .find_by_email(&email)
            .await
            .map_err(provider_error)?
            .is_some()
        {
            return Err(AuthError::AccountExists);
        }

        let hash = self.passwords.hash(password)?;
        let credential = self
            .credentials
            .insert(Credential::new(email, hash))
            .await
            .map_err(provider_error)?;

        tracing::info!(user_id = %credential.user_id, email = %mask_email(&credential.email), "Account created");
        Ok(credential.user_id)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Uuid, AuthError> {
        let email = email.trim().to_lowercase();
        let credential = self
            .credentials
            .find_by_email(&email)
            .await
            .map_err(provider_error)?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.passwords.verify(password, &credential.password_hash)? {
            tracing::debug!(email = %mask_email(&email), "Password mismatch");
            return Err(AuthError::InvalidCredentials);
        }
        Ok(credential.user_id)
    }

    async fn delete_account(&self, user_id: Uuid) -> Result<(), AuthError> {
        self.credentials
            .delete(user_id)
            .await
            .map_err(provider_error)?;
        tracing::info!(%user_id, "Account removed");
        Ok(())
    }
}
