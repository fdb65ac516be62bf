//! Cookie names and Set-Cookie construction
//!
//! Identity rides on five cookies set together at login and cleared
//! together at logout. Only `terrace_session` is trusted server-side;
//! the plaintext email cookie exists for page scripts and is never read
//! by handlers.

use axum::http::{header, HeaderMap};

/// HMAC-signed session cookie - the one handlers trust
pub const SESSION_COOKIE: &str = "terrace_session";
/// Provider access token (opaque)
pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
/// Provider refresh token (opaque)
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";
/// Plaintext email for page scripts - intentionally NOT HttpOnly
pub const USER_EMAIL_COOKIE: &str = "userEmail";
/// Which provider instance issued the session
pub const ACCOUNTS_SERVER_COOKIE: &str = "accountsServer";
/// Short-lived signed CSRF state expectation
pub const STATE_COOKIE: &str = "oauthState";

/// Thirty days, the refresh-token and email cookie lifetime
pub const THIRTY_DAYS_SECS: i64 = 60 * 60 * 24 * 30;
/// Lifetime of the CSRF state cookie
pub const STATE_COOKIE_SECS: i64 = 60 * 10;

/// Build a Set-Cookie value
pub fn build_cookie(
    name: &str,
    value: &str,
    max_age_secs: i64,
    http_only: bool,
    secure: bool,
) -> String {
    let mut cookie = format!("{name}={value}; Path=/; SameSite=Lax; Max-Age={max_age_secs}");
    if http_only {
        cookie.push_str("; HttpOnly");
    }
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Build a Set-Cookie value that removes the cookie
pub fn clear_cookie(name: &str, http_only: bool, secure: bool) -> String {
    build_cookie(name, "", 0, http_only, secure)
}

/// Read a cookie from the request headers
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;
    for cookie in cookie_header.split(';') {
        let cookie = cookie.trim();
        if let Some(value) = cookie.strip_prefix(name) {
            if let Some(value) = value.strip_prefix('=') {
                return Some(value.to_string());
            }
        }
    }
    None
}
