//! Axum extractors for authentication

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::cookies::{read_cookie, SESSION_COOKIE};
use crate::state::AppState;

/// Authenticated user extracted from the signed session cookie.
///
/// Presence of other identity cookies proves nothing; only a cookie whose
/// HMAC verifies against the server secret passes.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub email: String,
}

/// Error response for auth failures
#[derive(Debug, Serialize)]
struct AuthErrorResponse {
    error: AuthErrorDetail,
}

#[derive(Debug, Serialize)]
struct AuthErrorDetail {
    code: &'static str,
    message: &'static str,
}

/// Auth rejection type
pub struct AuthRejection {
    code: &'static str,
    message: &'static str,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let body = AuthErrorResponse {
            error: AuthErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let cookie = read_cookie(&parts.headers, SESSION_COOKIE).ok_or(AuthRejection {
            code: "NOT_AUTHENTICATED",
            message: "No session cookie provided",
        })?;

        let payload = app_state.sessions.verify(&cookie).map_err(|e| {
            tracing::debug!(error = ?e, "session verification failed");
            AuthRejection {
                code: "INVALID_SESSION",
                message: "Invalid or expired session",
            }
        })?;

        Ok(AuthUser {
            email: payload.email,
        })
    }
}
