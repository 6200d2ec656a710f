pub mod user;

pub use user::{Credential, NewCredential, User};
