//! Carries the session token between client and server in a cookie.
//!
//! The write side goes through [`CookieSink`], a narrow capability handed to
//! whoever builds the response. The read side treats the cookie as untrusted
//! input; callers must still validate the token it carries.

use actix_web::cookie::{time::Duration, Cookie, SameSite};
use actix_web::{HttpRequest, HttpResponseBuilder};
use thiserror::Error;

pub const SESSION_COOKIE_NAME: &str = "token";

/// Cookie lifetime. Deliberately longer than the token it carries.
pub const SESSION_MAX_AGE_DAYS: i64 = 14;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("no session cookie present")]
    NoSession,
}

/// Something that can emit a `Set-Cookie` on the way out.
pub trait CookieSink {
    fn set_cookie(&mut self, cookie: Cookie<'static>);
}

impl CookieSink for HttpResponseBuilder {
    fn set_cookie(&mut self, cookie: Cookie<'static>) {
        self.cookie(cookie);
    }
}

/// Builds the session cookie for `token`.
///
/// # Arguments
/// * `token` - A signed session token.
///
/// # Returns
/// Cookie `token` with `Path=/`, `HttpOnly`, `Secure`, `SameSite=Lax` and a
/// fourteen-day `Max-Age`.
pub fn session_cookie(token: &str) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE_NAME, token.to_owned())
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::days(SESSION_MAX_AGE_DAYS))
        .finish()
}

/// Puts the session token on an outgoing response.
///
/// # Arguments
/// * `sink` - The response under construction.
/// * `token` - A signed session token.
///
/// Emits exactly one `Set-Cookie` header. Call at most once per response.
pub fn attach<S: CookieSink + ?Sized>(sink: &mut S, token: &str) {
    sink.set_cookie(session_cookie(token));
}

/// Reads the session token off a request.
///
/// # Arguments
/// * `req` - The incoming request.
///
/// # Returns
/// The raw cookie value, unvalidated. An absent or empty cookie is
/// `SessionError::NoSession`.
pub fn extract(req: &HttpRequest) -> Result<String, SessionError> {
    req.cookie(SESSION_COOKIE_NAME)
        .map(|cookie| cookie.value().to_owned())
        .filter(|value| !value.is_empty())
        .ok_or(SessionError::NoSession)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header;
    use actix_web::{test as actix_test, HttpResponse};
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct RecordingSink(Vec<Cookie<'static>>);

    impl CookieSink for RecordingSink {
        fn set_cookie(&mut self, cookie: Cookie<'static>) {
            self.0.push(cookie);
        }
    }

    #[test]
    fn test_attach_sets_expected_attributes() {
        let mut sink = RecordingSink::default();
        attach(&mut sink, "header.payload.signature");

        assert_eq!(sink.0.len(), 1);
        let cookie = &sink.0[0];
        assert_eq!(cookie.name(), "token");
        assert_eq!(cookie.value(), "header.payload.signature");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(Duration::seconds(1_209_600)));
    }

    #[test]
    fn test_attach_emits_single_header() {
        let mut builder = HttpResponse::Ok();
        attach(&mut builder, "abc.def.ghi");
        let response = builder.finish();

        let headers: Vec<_> = response.headers().get_all(header::SET_COOKIE).collect();
        assert_eq!(headers.len(), 1);

        let raw = headers[0].to_str().unwrap();
        assert!(raw.starts_with("token=abc.def.ghi"));
        assert!(raw.contains("HttpOnly"));
        assert!(raw.contains("Secure"));
        assert!(raw.contains("SameSite=Lax"));
        assert!(raw.contains("Max-Age=1209600"));
    }

    #[test]
    fn test_cookie_round_trip() {
        let mut builder = HttpResponse::Ok();
        attach(&mut builder, "abc.def.ghi");
        let response = builder.finish();
        let issued = response.cookies().next().unwrap();

        let req = actix_test::TestRequest::default()
            .cookie(Cookie::new(issued.name().to_owned(), issued.value().to_owned()))
            .to_http_request();
        assert_eq!(extract(&req), Ok("abc.def.ghi".to_string()));
    }

    #[test]
    fn test_extract_without_cookie() {
        let req = actix_test::TestRequest::default().to_http_request();
        assert_eq!(extract(&req), Err(SessionError::NoSession));

        let req = actix_test::TestRequest::default()
            .cookie(Cookie::new("other", "value"))
            .to_http_request();
        assert_eq!(extract(&req), Err(SessionError::NoSession));
    }
}
