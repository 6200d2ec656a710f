pub mod extractors;
pub mod password;
pub mod service;
pub mod session;
pub mod token;

use serde::Deserialize;
use validator::Validate;

pub use extractors::Caller;
pub use password::{hash_password, verify_password};
pub use service::{AuthOutcome, AuthService, SignedIn};
pub use token::{Claims, TokenCodec};

/// Payload for registering a new credential.
#[derive(Debug, Deserialize, Validate)]
pub struct SignUpRequest {
    /// Display name.
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    /// Login identity; must be unique across users.
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Payload for exchanging a credential for a session.
///
/// Not validated: an empty email simply matches no user.
#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_sign_up_request_validation() {
        let valid = SignUpRequest {
            name: "A".to_string(),
            email: "a@x.com".to_string(),
            password: "secret".to_string(),
        };
        assert!(valid.validate().is_ok());

        let missing_email = SignUpRequest {
            name: "A".to_string(),
            email: "".to_string(),
            password: "secret".to_string(),
        };
        let errors = missing_email.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
        assert!(errors.to_string().contains("email"));
    }

    #[test]
    fn test_sign_in_request_deserializes() {
        let request: SignInRequest =
            serde_json::from_str(r#"{"email": "a@x.com", "password": "secret"}"#).unwrap();
        assert_eq!(request.email, "a@x.com");
    }
}
