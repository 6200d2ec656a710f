use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{CredentialStore, StoreError};
use crate::models::{Credential, NewCredential};

/// Process-local `CredentialStore`, used by tests and local runs without a database.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    last_id: i32,
    rows: Vec<Credential>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deletes a credential, returning whether it existed.
    pub async fn remove(&self, id: i32) -> bool {
        let mut inner = self.inner.write().await;
        let before = inner.rows.len();
        inner.rows.retain(|row| row.id != id);
        inner.rows.len() != before
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Credential>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.rows.iter().find(|row| row.email == email).cloned())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Credential>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.rows.iter().find(|row| row.id == id).cloned())
    }

    async fn insert(&self, credential: NewCredential) -> Result<i32, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.rows.iter().any(|row| row.email == credential.email) {
            return Err(StoreError::Duplicate);
        }

        inner.last_id += 1;
        let id = inner.last_id;
        inner.rows.push(Credential {
            id,
            name: credential.name,
            email: credential.email,
            password_hash: credential.password_hash,
        });
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_credential(email: &str) -> NewCredential {
        NewCredential {
            name: "tester".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[actix_rt::test]
    async fn test_insert_and_find() {
        let store = InMemoryCredentialStore::new();
        let id = store.insert(new_credential("a@x.com")).await.unwrap();

        let by_email = store.find_by_email("a@x.com").await.unwrap().unwrap();
        let by_id = store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(by_email.id, id);
        assert_eq!(by_id.email, "a@x.com");
        assert!(store.find_by_email("b@x.com").await.unwrap().is_none());
    }

    #[actix_rt::test]
    async fn test_duplicate_email_rejected() {
        let store = InMemoryCredentialStore::new();
        store.insert(new_credential("a@x.com")).await.unwrap();

        let result = store.insert(new_credential("a@x.com")).await;
        assert!(matches!(result, Err(StoreError::Duplicate)));
        assert_eq!(store.len().await, 1);
    }

    #[actix_rt::test]
    async fn test_remove_does_not_reuse_ids() {
        let store = InMemoryCredentialStore::new();
        let first = store.insert(new_credential("a@x.com")).await.unwrap();
        assert!(store.remove(first).await);
        assert!(!store.remove(first).await);

        let second = store.insert(new_credential("b@x.com")).await.unwrap();
        assert_ne!(first, second);
        assert!(store.find_by_id(first).await.unwrap().is_none());
    }
}
