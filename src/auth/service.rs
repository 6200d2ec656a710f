//! Sign-up, sign-in and caller resolution.
//!
//! Each use case returns a typed outcome instead of raising; the transport
//! converts outcomes into [`AppError`] only at the API boundary.

use actix_web::{web, HttpRequest};
use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use std::sync::Arc;
use validator::Validate;

use super::password::{hash_password, verify_password, MAX_PASSWORD_BYTES};
use super::session;
use super::token::TokenCodec;
use super::{SignInRequest, SignUpRequest};
use crate::error::AppError;
use crate::models::{NewCredential, User};
use crate::store::{CredentialStore, StoreError};

/// Shown for both an unknown email and a wrong password.
pub const INVALID_CREDENTIALS_MESSAGE: &str =
    "No user matches that email address and password.";

/// Result of a sign-up or sign-in attempt.
#[derive(Debug)]
pub enum AuthOutcome<T> {
    Success(T),
    InvalidCredentials,
    ValidationFailed(String),
    /// Carries the cause for server-side logging only.
    InternalFailure(String),
}

impl<T> AuthOutcome<T> {
    /// Converts the outcome into the error taxonomy surfaced by the API.
    pub fn into_result(self) -> Result<T, AppError> {
        match self {
            AuthOutcome::Success(value) => Ok(value),
            AuthOutcome::InvalidCredentials => {
                Err(AppError::Unauthorized(INVALID_CREDENTIALS_MESSAGE.into()))
            }
            AuthOutcome::ValidationFailed(details) => Err(AppError::ValidationError(details)),
            AuthOutcome::InternalFailure(cause) => Err(AppError::InternalServerError(cause)),
        }
    }
}

/// A successful sign-in. The caller attaches `token` to the response.
#[derive(Debug)]
pub struct SignedIn {
    pub token: String,
    pub user: User,
}

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    tokens: TokenCodec,
}

impl AuthService {
    /// Builds the orchestrator from a storage collaborator and a codec that
    /// already holds the process-wide signing secret.
    pub fn new(store: Arc<dyn CredentialStore>, tokens: TokenCodec) -> Self {
        Self { store, tokens }
    }

    /// Registers a new credential.
    ///
    /// # Arguments
    /// * `input` - Name, email and plaintext password; all must be non-empty.
    ///
    /// # Returns
    /// `Success` with the stored user, `ValidationFailed` for bad input or an
    /// already registered email, `InternalFailure` if hashing or storage fails.
    /// Nothing is persisted unless the result is `Success`.
    pub async fn register(&self, input: SignUpRequest) -> AuthOutcome<User> {
        if let Err(errors) = input.validate() {
            return AuthOutcome::ValidationFailed(errors.to_string());
        }
        if input.password.len() > MAX_PASSWORD_BYTES {
            return AuthOutcome::ValidationFailed(format!(
                "password: must be at most {} bytes",
                MAX_PASSWORD_BYTES
            ));
        }

        match self.store.find_by_email(&input.email).await {
            Ok(Some(_)) => return AuthOutcome::ValidationFailed(StoreError::Duplicate.to_string()),
            Ok(None) => {}
            Err(e) => return AuthOutcome::InternalFailure(e.to_string()),
        }

        let SignUpRequest {
            name,
            email,
            password,
        } = input;

        // bcrypt is deliberately slow; keep it off the async workers.
        let password_hash = match web::block(move || hash_password(&password)).await {
            Ok(Ok(hash)) => hash,
            Ok(Err(e)) => return AuthOutcome::InternalFailure(e.to_string()),
            Err(e) => return AuthOutcome::InternalFailure(format!("hashing task failed: {}", e)),
        };

        let new_credential = NewCredential {
            name: name.clone(),
            email: email.clone(),
            password_hash,
        };
        match self.store.insert(new_credential).await {
            Ok(id) => {
                info!("registered user {}", id);
                AuthOutcome::Success(User { id, name, email })
            }
            // Lost a race with a concurrent registration for the same email.
            Err(StoreError::Duplicate) => {
                AuthOutcome::ValidationFailed(StoreError::Duplicate.to_string())
            }
            Err(e) => AuthOutcome::InternalFailure(e.to_string()),
        }
    }

    /// Exchanges an email and password for a session token.
    ///
    /// # Arguments
    /// * `input` - The presented credential.
    /// * `now` - Issue time of the token.
    ///
    /// # Returns
    /// `Success` with the token and user; the caller attaches the token to its
    /// response. An unknown email and a wrong password both yield
    /// `InvalidCredentials`.
    pub async fn sign_in(&self, input: SignInRequest, now: DateTime<Utc>) -> AuthOutcome<SignedIn> {
        let credential = match self.store.find_by_email(&input.email).await {
            Ok(Some(credential)) => credential,
            Ok(None) => {
                debug!("sign-in for unknown email");
                return AuthOutcome::InvalidCredentials;
            }
            Err(e) => return AuthOutcome::InternalFailure(e.to_string()),
        };

        let password = input.password;
        let hash = credential.password_hash.clone();
        let matches = match web::block(move || verify_password(&password, &hash)).await {
            Ok(matches) => matches,
            Err(e) => {
                return AuthOutcome::InternalFailure(format!("verification task failed: {}", e))
            }
        };
        if !matches {
            debug!("sign-in with wrong password for user {}", credential.id);
            return AuthOutcome::InvalidCredentials;
        }

        match self.tokens.issue(credential.id, now) {
            Ok(token) => {
                info!("user {} signed in", credential.id);
                AuthOutcome::Success(SignedIn {
                    token,
                    user: credential.into(),
                })
            }
            Err(e) => AuthOutcome::InternalFailure(e.to_string()),
        }
    }

    /// Derives a trusted identity from the session cookie of an inbound request.
    pub async fn resolve_caller(&self, req: &HttpRequest, now: DateTime<Utc>) -> Result<User, AppError> {
        let token = session::extract(req)?;
        self.resolve_token(&token, now).await
    }

    /// Validates a raw token against `now` and loads its subject.
    ///
    /// Malformed, forged and expired tokens, and tokens whose user no longer
    /// exists, all return `AppError::Unauthorized`.
    pub async fn resolve_token(&self, token: &str, now: DateTime<Utc>) -> Result<User, AppError> {
        let subject = self.tokens.validate(token, now).map_err(|e| {
            debug!("rejected session token: {}", e);
            AppError::from(e)
        })?;

        match self.store.find_by_id(subject).await {
            Ok(Some(credential)) => Ok(credential.into()),
            Ok(None) => {
                warn!("session token refers to missing user {}", subject);
                Err(AppError::unauthorized())
            }
            Err(e) => {
                error!("failed to load session subject {}: {}", subject, e);
                Err(e.into())
            }
        }
    }

    /// Loads a user by id, or `AppError::NotFound`.
    pub async fn find_user(&self, id: i32) -> Result<User, AppError> {
        self.store
            .find_by_id(id)
            .await?
            .map(User::from)
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }
}
