//!
//! # Error Handling
//!
//! This module defines `AppError`, the closed set of failures that may cross the
//! API boundary, and the presenter that turns them into response bodies.
//!
//! Every failure maps to exactly one `(code, message)` pair through
//! [`AppError::view`]. Errors travel in-band: the HTTP status stays `200 OK` and
//! the pair is attached to the error entry's `extensions` object, keeping the
//! machine-readable code apart from the human-readable text.
//!
//! `From` implementations for the crate's leaf errors and for `sqlx`,
//! `validator` and `bcrypt` errors allow conversion with the `?` operator.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use log::error;
use serde::Serialize;
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

use crate::auth::session::SessionError;
use crate::auth::token::TokenError;
use crate::store::StoreError;

/// Message surfaced for every 500-class failure; the detail stays in the server log.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// Every failure that can be surfaced to an API client.
#[derive(Debug)]
pub enum AppError {
    /// Client-correctable input problem (400).
    ValidationError(String),
    /// Missing session, invalid session, or rejected credentials (401).
    Unauthorized(String),
    /// Resource absent or not visible to the caller (404).
    NotFound(String),
    /// Anything unexpected (500). The message is for logs only.
    InternalServerError(String),
}

/// The `(code, message)` pair presented to clients. Serializes as the
/// error entry's `extensions` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorView {
    pub code: u16,
    #[serde(rename = "error")]
    pub message: String,
}

impl AppError {
    pub fn unauthorized() -> Self {
        AppError::Unauthorized("Unauthorized".into())
    }

    /// HTTP-style status code carried in `extensions.code`.
    pub fn code(&self) -> u16 {
        match self {
            AppError::ValidationError(_) => 400,
            AppError::Unauthorized(_) => 401,
            AppError::NotFound(_) => 404,
            AppError::InternalServerError(_) => 500,
        }
    }

    pub fn view(&self) -> ErrorView {
        let message = match self {
            AppError::ValidationError(msg)
            | AppError::Unauthorized(msg)
            | AppError::NotFound(msg) => msg.clone(),
            AppError::InternalServerError(_) => INTERNAL_ERROR_MESSAGE.to_string(),
        };
        ErrorView {
            code: self.code(),
            message,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Presents `AppError` as an in-band error entry.
///
/// The transport status is always `200 OK`; clients read
/// `errors[0].extensions.code` to branch on the failure kind.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        StatusCode::OK
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::InternalServerError(detail) = self {
            error!("internal failure surfaced to client: {}", detail);
        }
        let view = self.view();
        HttpResponse::Ok().json(json!({
            "data": null,
            "errors": [{ "message": view.message.clone(), "extensions": view }]
        }))
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

/// `RowNotFound` becomes a 404; every other database error is internal.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::InternalServerError(error.to_string()),
        }
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(format!("Password hashing failed: {}", error))
    }
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> AppError {
        match error {
            StoreError::Duplicate => AppError::ValidationError(error.to_string()),
            StoreError::Database(e) => AppError::from(e),
        }
    }
}

/// All token failures collapse into one externally visible outcome.
impl From<TokenError> for AppError {
    fn from(error: TokenError) -> AppError {
        match error {
            TokenError::Signing(detail) => AppError::InternalServerError(detail),
            TokenError::Malformed | TokenError::BadSignature | TokenError::Expired => {
                AppError::unauthorized()
            }
        }
    }
}

impl From<SessionError> for AppError {
    fn from(_: SessionError) -> AppError {
        AppError::unauthorized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_error_codes() {
        assert_eq!(AppError::ValidationError("bad".into()).code(), 400);
        assert_eq!(AppError::Unauthorized("no".into()).code(), 401);
        assert_eq!(AppError::NotFound("gone".into()).code(), 404);
        assert_eq!(AppError::InternalServerError("boom".into()).code(), 500);
    }

    #[test]
    fn test_internal_detail_is_not_exposed() {
        let view = AppError::InternalServerError("connection refused at 10.0.0.3".into()).view();
        assert_eq!(
            view,
            ErrorView {
                code: 500,
                message: INTERNAL_ERROR_MESSAGE.to_string()
            }
        );
    }

    #[test]
    fn test_view_serializes_as_extensions() {
        let view = AppError::Unauthorized("Unauthorized".into()).view();
        assert_eq!(
            serde_json::to_value(&view).unwrap(),
            json!({ "code": 401, "error": "Unauthorized" })
        );
    }

    #[test]
    fn test_token_errors_collapse_to_unauthorized() {
        for err in [TokenError::Malformed, TokenError::BadSignature, TokenError::Expired] {
            assert_eq!(AppError::from(err).view(), AppError::unauthorized().view());
        }
    }

    #[test]
    fn test_store_errors() {
        assert_eq!(AppError::from(StoreError::Duplicate).code(), 400);
        assert_eq!(
            AppError::from(StoreError::Database(sqlx::Error::PoolTimedOut)).code(),
            500
        );
        assert_eq!(
            AppError::from(StoreError::Database(sqlx::Error::RowNotFound)).code(),
            404
        );
    }

    #[actix_rt::test]
    async fn test_error_response_is_in_band() {
        let response = AppError::NotFound("User not found".into()).error_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["data"].is_null());
        assert_eq!(json["errors"][0]["extensions"]["code"], 404);
        assert_eq!(json["errors"][0]["extensions"]["error"], "User not found");
        assert_eq!(json["errors"][0]["message"], "User not found");
    }
}
