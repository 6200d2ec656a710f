use crate::{auth::AuthService, auth::Caller, error::AppError};
use actix_web::{get, web, Responder};

use super::data;

/// The signed-in user.
#[get("/me")]
pub async fn viewer(caller: Caller) -> impl Responder {
    data("viewer", caller.0)
}

/// Looks up any registered user by id. Requires a session.
#[get("/{id}")]
pub async fn user(
    _caller: Caller,
    service: web::Data<AuthService>,
    id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let user = service.find_user(id.into_inner()).await?;
    Ok(data("user", user))
}
