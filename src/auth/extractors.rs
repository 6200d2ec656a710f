use actix_web::dev::Payload;
use actix_web::{web, Error as ActixError, FromRequest, HttpRequest};
use chrono::Utc;
use futures::future::LocalBoxFuture;

use super::service::AuthService;
use crate::error::AppError;
use crate::models::User;

/// The authenticated caller of a protected handler.
///
/// Extraction reads the session cookie, validates the token and loads the
/// subject; any failure short-circuits the handler with a 401 (or a 500 if
/// storage is unreachable).
#[derive(Debug, Clone)]
pub struct Caller(pub User);

impl FromRequest for Caller {
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let service = req.app_data::<web::Data<AuthService>>().cloned().ok_or_else(|| {
                AppError::InternalServerError("AuthService is not registered as app data".into())
            })?;
            let user = service.resolve_caller(&req, Utc::now()).await?;
            Ok::<_, ActixError>(Caller(user))
        })
    }
}
