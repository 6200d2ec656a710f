use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Lifetime of an issued token, independent of the cookie carrying it.
pub const TOKEN_TTL_HOURS: i64 = 24;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Claims encoded within a session token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject of the token: the credential's id.
    pub sub: i32,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,
    #[error("token signature is invalid")]
    BadSignature,
    #[error("token has expired")]
    Expired,
    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Issues and validates HS256 session tokens.
///
/// The signing key is fixed at construction. Validation pins the algorithm,
/// so the `alg` header of an incoming token is never trusted. Expiry is
/// checked against the caller-supplied `now`, not the wall clock.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// Creates a codec for one HMAC secret.
    ///
    /// # Arguments
    /// * `secret` - The signing key, shared by issue and validate.
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        // Expiry is compared against the injected clock in `validate`.
        validation.validate_exp = false;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Signs a token for a user.
    ///
    /// # Arguments
    /// * `subject_id` - The user id placed in `sub`.
    /// * `now` - Issue time; the token expires `TOKEN_TTL_HOURS` later.
    ///
    /// # Returns
    /// The compact JWT, or `TokenError::Signing` if encoding fails.
    pub fn issue(&self, subject_id: i32, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims {
            sub: subject_id,
            iat: now.timestamp(),
            exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
        };

        encode(&Header::new(ALGORITHM), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Checks a token and recovers its subject.
    ///
    /// # Arguments
    /// * `token` - Untrusted input, typically the session cookie value.
    /// * `now` - Time the expiry is checked against.
    ///
    /// # Returns
    /// The subject id of a valid token. Otherwise `Malformed`, `BadSignature`
    /// or `Expired`; a token is expired once `now >= exp`.
    pub fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<i32, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenError::BadSignature
                }
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            })?;

        if now.timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }
        Ok(claims.sub)
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &ALGORITHM)
            .field("secret", &"<redacted>")
            .finish()
    }
}
