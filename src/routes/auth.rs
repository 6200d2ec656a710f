use crate::{
    auth::{session, AuthService, SignInRequest, SignUpRequest},
    error::AppError,
};
use actix_web::{post, web, HttpResponse, Responder};
use chrono::Utc;

use super::{data, data_with};

/// Register a new user
///
/// Stores the credential; does not start a session.
#[post("/register")]
pub async fn register(
    service: web::Data<AuthService>,
    payload: web::Json<SignUpRequest>,
) -> Result<impl Responder, AppError> {
    let user = service.register(payload.into_inner()).await.into_result()?;
    Ok(data("signUp", user))
}

/// Sign in
///
/// Verifies the credential and sets the session cookie on success. No cookie
/// is attached when the credential is rejected.
#[post("/sign_in")]
pub async fn sign_in(
    service: web::Data<AuthService>,
    payload: web::Json<SignInRequest>,
) -> Result<impl Responder, AppError> {
    let signed_in = service
        .sign_in(payload.into_inner(), Utc::now())
        .await
        .into_result()?;

    let mut response = HttpResponse::Ok();
    session::attach(&mut response, &signed_in.token);
    Ok(data_with(response, "signIn", signed_in.user))
}
