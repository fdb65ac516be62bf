//! Authentication handlers (login, callback, logout, me)
//!
//! The OAuth dance: `/auth/login` redirects to the provider with a signed
//! CSRF state expectation, `/auth/callback` exchanges the returned code
//! and establishes the cookie session, `/auth/me` reports the verified
//! identity, `/auth/logout` revokes and clears.

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Redirect};
use axum::Json;
use serde::{Deserialize, Serialize};

use terrace_auth_core::AuthError;

use crate::cookies::{
    build_cookie, clear_cookie, read_cookie, ACCESS_TOKEN_COOKIE, ACCOUNTS_SERVER_COOKIE,
    REFRESH_TOKEN_COOKIE, SESSION_COOKIE, STATE_COOKIE, STATE_COOKIE_SECS, THIRTY_DAYS_SECS,
    USER_EMAIL_COOKIE,
};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    /// Provider instance to authenticate against (multi-DC providers)
    #[serde(rename = "accounts-server")]
    pub accounts_server: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    #[serde(rename = "accounts-server")]
    pub accounts_server: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub message: &'static str,
    pub timestamp: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /auth/login
///
/// Issue a CSRF state expectation and redirect to the provider.
pub async fn login(
    State(state): State<AppState>,
    Query(query): Query<LoginQuery>,
) -> ApiResult<impl IntoResponse> {
    let (nonce, state_cookie) = state.states.issue()?;

    let url = state
        .oauth
        .authorize_url(&nonce, query.accounts_server.as_deref())?;

    tracing::debug!("redirecting to provider for authorization");

    let cookie = build_cookie(
        STATE_COOKIE,
        &state_cookie,
        STATE_COOKIE_SECS,
        true,
        state.config.cookie_secure,
    );

    Ok(([(header::SET_COOKIE, cookie)], Redirect::temporary(&url)))
}

/// GET /auth/callback
///
/// Exchange the authorization code, fetch the profile, and establish the
/// cookie session. Any failure leaves the browser without identity
/// cookies - there is no partially-established session.
pub async fn callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
    headers: HeaderMap,
) -> ApiResult<impl IntoResponse> {
    let code = query
        .code
        .filter(|c| !c.is_empty())
        .ok_or(AuthError::MissingCode)?;

    // The state echo must match the signed expectation from /auth/login
    let returned_state = query.state.unwrap_or_default();
    let state_cookie =
        read_cookie(&headers, STATE_COOKIE).ok_or(AuthError::StateMismatch)?;
    state.states.verify(&state_cookie, &returned_state)?;

    let accounts_server = query
        .accounts_server
        .unwrap_or_else(|| state.oauth.default_accounts_server().to_string());

    let tokens = state.oauth.exchange_code(&code, &accounts_server).await?;

    let userinfo = state
        .oauth
        .fetch_userinfo(&tokens.access_token, &accounts_server)
        .await?;
    let email = userinfo.email().ok_or(AuthError::ProfileMissingEmail)?;

    let session_cookie = state.sessions.issue(email)?;

    tracing::info!(email = %email, "session established");
    metrics::counter!("auth_logins_total").increment(1);

    let secure = state.config.cookie_secure;
    let session_max_age = i64::from(state.config.session_duration_hours) * 3600;

    let mut response_headers = HeaderMap::new();
    let mut set_cookie = |value: String| {
        if let Ok(header_value) = HeaderValue::from_str(&value) {
            response_headers.append(header::SET_COOKIE, header_value);
        }
    };

    set_cookie(build_cookie(
        ACCESS_TOKEN_COOKIE,
        &tokens.access_token,
        tokens.expires_in as i64,
        true,
        secure,
    ));
    if let Some(refresh_token) = &tokens.refresh_token {
        set_cookie(build_cookie(
            REFRESH_TOKEN_COOKIE,
            refresh_token,
            THIRTY_DAYS_SECS,
            true,
            secure,
        ));
    }
    // Script-readable email for the dashboard UI; never trusted server-side
    set_cookie(build_cookie(
        USER_EMAIL_COOKIE,
        email,
        THIRTY_DAYS_SECS,
        false,
        secure,
    ));
    set_cookie(build_cookie(
        ACCOUNTS_SERVER_COOKIE,
        &accounts_server,
        THIRTY_DAYS_SECS,
        true,
        secure,
    ));
    set_cookie(build_cookie(
        SESSION_COOKIE,
        &session_cookie,
        session_max_age,
        true,
        secure,
    ));
    // The login attempt is complete; drop its state expectation
    set_cookie(clear_cookie(STATE_COOKIE, true, secure));

    Ok((
        response_headers,
        Redirect::temporary(&state.config.post_login_redirect),
    ))
}

/// GET /auth/me
///
/// Report the verified session identity.
pub async fn me(auth_user: AuthUser) -> ApiResult<Json<MeResponse>> {
    Ok(Json(MeResponse {
        email: auth_user.email,
    }))
}

/// GET /auth/logout
///
/// Best-effort token revocation, then clear every identity cookie.
/// Revocation failure never blocks the cookie clearing.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<impl IntoResponse> {
    if let Some(refresh_token) = read_cookie(&headers, REFRESH_TOKEN_COOKIE) {
        let accounts_server = read_cookie(&headers, ACCOUNTS_SERVER_COOKIE)
            .unwrap_or_else(|| state.oauth.default_accounts_server().to_string());

        if let Err(e) = state
            .oauth
            .revoke_token(&refresh_token, &accounts_server)
            .await
        {
            tracing::warn!(error = %e, "refresh token revocation failed; clearing cookies anyway");
        }
    }

    let secure = state.config.cookie_secure;
    let mut response_headers = HeaderMap::new();
    for (name, http_only) in [
        (ACCESS_TOKEN_COOKIE, true),
        (REFRESH_TOKEN_COOKIE, true),
        (USER_EMAIL_COOKIE, false),
        (ACCOUNTS_SERVER_COOKIE, true),
        (SESSION_COOKIE, true),
    ] {
        if let Ok(value) = HeaderValue::from_str(&clear_cookie(name, http_only, secure)) {
            response_headers.append(header::SET_COOKIE, value);
        }
    }

    tracing::info!("session cleared");

    Ok((
        response_headers,
        Json(LogoutResponse {
            message: "Logged out successfully",
            timestamp: chrono::Utc::now().to_rfc3339(),
        }),
    ))
}
