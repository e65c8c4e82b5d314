//! The session is a private cookie carrying the authenticated user's id.
//! Rocket encrypts and signs it with the configured `secret_key`, so a
//! client can't forge or read it.

use super::models::User;
use rocket::http::{Cookie, CookieJar, SameSite};

pub const SESSION_COOKIE: &str = "user_id";

pub fn establish(cookies: &CookieJar<'_>, user: &User) {
    let cookie = Cookie::build((SESSION_COOKIE, user.id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    cookies.add_private(cookie);
}

pub fn clear(cookies: &CookieJar<'_>) {
    cookies.remove_private(Cookie::build(SESSION_COOKIE).path("/"));
}

/// The user id bound to this request's session, if there is one.
pub fn user_id(cookies: &CookieJar<'_>) -> Option<i32> {
    cookies
        .get_private(SESSION_COOKIE)
        .and_then(|cookie| cookie.value().parse::<i32>().ok())
}
