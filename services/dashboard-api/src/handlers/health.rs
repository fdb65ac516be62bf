//! Health check handlers

use axum::extract::State;
use axum::http::StatusCode;

use crate::state::AppState;

/// GET /health - liveness probe
pub async fn health() -> &'static str {
    "OK"
}

/// GET /ready - readiness probe (checks the database)
pub async fn ready(State(state): State<AppState>) -> Result<&'static str, StatusCode> {
    terrace_db::ping(&state.pool).await.map_err(|e| {
        tracing::warn!(error = %e, "readiness probe failed");
        StatusCode::SERVICE_UNAVAILABLE
    })?;

    Ok("READY")
}
