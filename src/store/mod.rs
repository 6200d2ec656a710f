//! Storage seam for credentials.
//!
//! The auth subsystem only ever needs three operations; everything else about
//! persistence stays behind this trait.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Credential, NewCredential};

pub use memory::InMemoryCredentialStore;
pub use postgres::PgCredentialStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Email already registered")]
    Duplicate,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Credential>, StoreError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Credential>, StoreError>;

    /// Persists the credential and returns its new id.
    async fn insert(&self, credential: NewCredential) -> Result<i32, StoreError>;
}
