//! Session cookie handling
//!
//! The session rides in an HTTP-only `jwt` cookie; handlers resolve
//! it to verified claims and take the organization scope from there,
//! never from the request body.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::config;

use super::jwt::{verify_session_jwt, SessionClaims, SESSION_TTL_HOURS};

pub const SESSION_COOKIE: &str = "jwt";

/// Build the session cookie around a signed token.
pub fn session_cookie(token: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Strict);
    cookie.set_secure(config::is_production());
    cookie.set_max_age(Duration::hours(SESSION_TTL_HOURS));
    cookie
}

/// Pull and verify the session claims from the request's cookie jar.
pub fn resolve_identity(jar: &CookieJar) -> Result<SessionClaims, String> {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or_else(|| "Not logged in".to_string())?;
    verify_session_jwt(&token)
}
