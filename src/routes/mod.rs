pub mod auth;
pub mod users;

use actix_cors::Cors;
use actix_web::{web, HttpResponse};
use serde::Serialize;
use serde_json::json;

use crate::error::AppError;

/// Mounts the API. Payload and path extraction failures are surfaced
/// through `AppError` so they share the in-band error format.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| AppError::NotFound(err.to_string()).into()),
    )
    .service(
        web::scope("/auth")
            .service(auth::register)
            .service(auth::sign_in),
    )
    .service(
        web::scope("/users")
            .service(users::viewer)
            .service(users::user),
    );
}

/// CORS policy for the API.
///
/// # Arguments
/// * `allowed_origin` - The single origin trusted with the session cookie.
///
/// # Returns
/// With an origin, a policy that admits only that origin and allows
/// credentials. Without one, any origin may call the API but browsers will
/// not attach or accept cookies cross-site.
pub fn cors(allowed_origin: Option<&str>) -> Cors {
    let cors = match allowed_origin {
        Some(origin) => Cors::default().allowed_origin(origin).supports_credentials(),
        None => Cors::default().allow_any_origin(),
    };
    cors.allow_any_method().allow_any_header().max_age(3600)
}

/// Wraps a successful result as `{"data": {field: value}}`.
pub(crate) fn data<T: Serialize>(field: &str, value: T) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "data": { field: value } }))
}

pub(crate) fn data_with<T: Serialize>(
    mut response: actix_web::HttpResponseBuilder,
    field: &str,
    value: T,
) -> HttpResponse {
    response.json(json!({ "data": { field: value } }))
}
