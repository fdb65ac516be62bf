//! Deal CRUD handlers
//!
//! Thin wrappers over the deal service: deserialize, coerce the numeric
//! fields the dashboard submits as text, and map errors. All authorization
//! lives in the service.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Instant;
use tracing::instrument;
use uuid::Uuid;

use terrace_deals_core::{DealInput, DealSummary};
use terrace_types::{Deal, DealId, DealStatus, ServiceType};

use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// Record HTTP operation duration with result label
#[inline]
fn record_op_duration(operation: &'static str, start: Instant, success: bool) {
    let result = if success { "ok" } else { "err" };
    metrics::histogram!(
        "deal_operation_duration_seconds",
        "operation" => operation,
        "result" => result
    )
    .record(start.elapsed().as_secs_f64());
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct DealRequest {
    #[serde(default = "default_status")]
    pub status: DealStatus,
    #[serde(default = "default_service_type")]
    pub service_type: ServiceType,
    pub customer: String,
    pub location: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub size: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub cost_or_budget: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub revenue_from_owner: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub revenue_from_tenant: f64,
    #[serde(default)]
    pub notes: String,
    pub start_date: Option<NaiveDate>,
    pub payment_date: Option<NaiveDate>,
    pub closed_date: Option<NaiveDate>,
}

fn default_status() -> DealStatus {
    DealStatus::Active
}

fn default_service_type() -> ServiceType {
    ServiceType::Owner
}

/// Accept a JSON number or a numeric string; the dashboard form submits
/// text inputs verbatim. Blank strings coerce to zero.
fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        String(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) if s.trim().is_empty() => Ok(0.0),
        NumberOrString::String(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid number: {s:?}"))),
    }
}

impl From<DealRequest> for DealInput {
    fn from(req: DealRequest) -> Self {
        Self {
            status: req.status,
            service_type: req.service_type,
            customer: req.customer,
            location: req.location,
            size: req.size,
            cost_or_budget: req.cost_or_budget,
            revenue_from_owner: req.revenue_from_owner,
            revenue_from_tenant: req.revenue_from_tenant,
            notes: req.notes,
            start_date: req.start_date,
            payment_date: req.payment_date,
            closed_date: req.closed_date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListDealsResponse {
    pub deals: Vec<Deal>,
}

#[derive(Debug, Serialize)]
pub struct DeleteDealResponse {
    pub deleted: bool,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub active_deals: i64,
    pub revenue_active: f64,
    pub revenue_closed: f64,
    pub fy_start: NaiveDate,
    pub fy_end: NaiveDate,
}

impl From<DealSummary> for SummaryResponse {
    fn from(s: DealSummary) -> Self {
        Self {
            active_deals: s.active_deals,
            revenue_active: s.revenue_active,
            revenue_closed: s.revenue_closed,
            fy_start: s.fy_start,
            fy_end: s.fy_end,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/deals
#[instrument(skip(state, user), fields(caller = %user.email))]
pub async fn list_deals(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<ListDealsResponse>> {
    let start = Instant::now();

    let deals = state.deals.list(&user.email).await?;

    record_op_duration("list_deals", start, true);
    Ok(Json(ListDealsResponse { deals }))
}

/// POST /api/v1/deals
#[instrument(skip(state, user, req), fields(caller = %user.email))]
pub async fn create_deal(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<DealRequest>,
) -> ApiResult<(StatusCode, Json<Deal>)> {
    let start = Instant::now();

    let deal = state.deals.create(&user.email, req.into()).await?;

    metrics::counter!("deals_created_total").increment(1);
    record_op_duration("create_deal", start, true);
    Ok((StatusCode::CREATED, Json(deal)))
}

/// PUT /api/v1/deals/{id}
#[instrument(skip(state, user, req), fields(caller = %user.email, deal_id = %id))]
pub async fn update_deal(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<DealRequest>,
) -> ApiResult<Json<Deal>> {
    let start = Instant::now();

    let deal = state
        .deals
        .update(&user.email, DealId(id), req.into())
        .await?;

    record_op_duration("update_deal", start, true);
    Ok(Json(deal))
}

/// DELETE /api/v1/deals/{id}
#[instrument(skip(state, user), fields(caller = %user.email, deal_id = %id))]
pub async fn delete_deal(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteDealResponse>> {
    let start = Instant::now();

    state.deals.delete(&user.email, DealId(id)).await?;

    metrics::counter!("deals_deleted_total").increment(1);
    record_op_duration("delete_deal", start, true);
    Ok(Json(DeleteDealResponse { deleted: true }))
}

/// GET /api/v1/deals/summary
#[instrument(skip(state, user), fields(caller = %user.email))]
pub async fn deal_summary(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<SummaryResponse>> {
    let start = Instant::now();

    let summary = state.deals.summary(&user.email).await?;

    record_op_duration("deal_summary", start, true);
    Ok(Json(summary.into()))
}
