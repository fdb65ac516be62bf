//! Sheet ingestion handler
//!
//! Runs the full ingestion pipeline synchronously on every request - no
//! cache, no incremental state. The response envelope keeps failure and
//! legitimately-empty results distinct: a fetch error is a 500 with
//! `success: false`, never an empty success.

use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::instrument;

use terrace_types::SheetData;

use crate::extractors::AuthUser;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SheetDataResponse {
    pub success: bool,
    pub data: SheetData,
    pub timestamp: String,
    pub source: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SheetDataError {
    pub success: bool,
    pub error: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SheetClientsResponse {
    pub success: bool,
    pub clients: Vec<terrace_types::ClientRecord>,
    pub timestamp: String,
    pub source: &'static str,
}

/// GET /api/v1/sheets/data
#[instrument(skip(state, _user))]
pub async fn get_sheet_data(State(state): State<AppState>, _user: AuthUser) -> Response {
    let start = Instant::now();

    let rows = match state.sheets.fetch_rows().await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!(error = %e, source = state.sheet_source_label, "sheet fetch failed");
            record_duration(start, false);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SheetDataError {
                    success: false,
                    error: "Failed to fetch sheet data",
                    message: e.to_string(),
                }),
            )
                .into_response();
        }
    };

    let data = terrace_ingest::ingest(&rows, &state.sheet_schema);
    record_duration(start, true);

    (
        StatusCode::OK,
        Json(SheetDataResponse {
            success: true,
            data,
            timestamp: chrono::Utc::now().to_rfc3339(),
            source: state.sheet_source_label,
        }),
    )
        .into_response()
}

/// GET /api/v1/sheets/clients
///
/// The client directory the dashboard views show: derived from the
/// classified property rows, merged through the one consolidated dedup.
#[instrument(skip(state, _user))]
pub async fn get_sheet_clients(State(state): State<AppState>, _user: AuthUser) -> Response {
    let start = Instant::now();

    let rows = match state.sheets.fetch_rows().await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!(error = %e, source = state.sheet_source_label, "sheet fetch failed");
            record_duration(start, false);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SheetDataError {
                    success: false,
                    error: "Failed to fetch sheet data",
                    message: e.to_string(),
                }),
            )
                .into_response();
        }
    };

    let data = terrace_ingest::ingest(&rows, &state.sheet_schema);
    let clients = terrace_ingest::clients_from_records(&data.properties);
    record_duration(start, true);

    (
        StatusCode::OK,
        Json(SheetClientsResponse {
            success: true,
            clients,
            timestamp: chrono::Utc::now().to_rfc3339(),
            source: state.sheet_source_label,
        }),
    )
        .into_response()
}

fn record_duration(start: Instant, success: bool) {
    let result = if success { "ok" } else { "err" };
    metrics::histogram!("sheet_ingest_duration_seconds", "result" => result)
        .record(start.elapsed().as_secs_f64());
}
