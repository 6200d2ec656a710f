use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered credential as stored by the persistence layer.
///
/// Never serialized; use [`User`] for anything leaving the process.
#[derive(Debug, Clone, FromRow)]
pub struct Credential {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// A credential waiting to be inserted. The hash is produced by the caller.
#[derive(Debug, Clone)]
pub struct NewCredential {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Public view of a registered identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
}

impl From<Credential> for User {
    fn from(credential: Credential) -> Self {
        Self {
            id: credential.id,
            name: credential.name,
            email: credential.email,
        }
    }
}
