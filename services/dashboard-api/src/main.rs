//! Terrace Dashboard API
//!
//! Backend for the brokerage dashboard.
//!
//! ## Auth Endpoints
//!
//! - `GET /auth/login` - Redirect to the OAuth provider
//! - `GET /auth/callback` - Code exchange, sets session cookies
//! - `GET /auth/logout` - Revoke and clear the session
//! - `GET /auth/me` - Verified identity of the caller
//!
//! ## API Endpoints (session-gated)
//!
//! - `GET /api/v1/sheets/data` - Run the spreadsheet ingestion pipeline
//! - `GET /api/v1/sheets/clients` - Deduplicated client directory
//! - `GET /api/v1/deals` - List the caller's deals
//! - `POST /api/v1/deals` - Create a deal
//! - `PUT /api/v1/deals/{id}` - Update a deal (owner or admin)
//! - `DELETE /api/v1/deals/{id}` - Delete a deal (owner or admin)
//! - `GET /api/v1/deals/summary` - Dashboard rollup
//!
//! ## Health Endpoints
//!
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe
//! - `GET /metrics` - Prometheus metrics

mod config;
mod cookies;
mod error;
mod extractors;
mod handlers;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, put};
use axum::Router;
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use terrace_auth_core::{OAuthClient, SessionManager, StateManager};
use terrace_db::pg::Repositories;
use terrace_deals_core::{DealService, DealsConfig};
use terrace_ingest::{RowSource, SheetsApiSource, XlsxSource};
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, SheetSource};
use crate::handlers::{health, ready};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("dashboard_api=debug".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Terrace Dashboard API");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(http_port = config.http_port, "Configuration loaded");

    // Initialize metrics
    let metrics_handle = if config.metrics_enabled {
        Some(setup_metrics()?)
    } else {
        None
    };

    // Create database pool
    let pool = terrace_db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    // Create repositories and the deal service
    let repos = Repositories::new(pool.clone());
    let deals = DealService::new(
        Arc::new(repos.deals.clone()),
        Arc::new(repos.team.clone()),
        DealsConfig::new(config.admin_email.clone()),
    );

    // Auth plumbing: provider client plus cookie signers
    let oauth = OAuthClient::new(config.oauth.clone());
    let sessions = SessionManager::new(&config.session_secret, config.session_duration_hours);
    let states = StateManager::new(&config.session_secret);

    // Sheet row source
    let (sheets, sheet_source_label): (Arc<dyn RowSource>, &'static str) =
        match &config.sheet_source {
            SheetSource::Api(api_config) => (
                Arc::new(SheetsApiSource::new(api_config.clone())),
                "sheets-api",
            ),
            SheetSource::Xlsx(path) => {
                tracing::warn!(path = %path.display(), "no sheets API credentials; using local workbook");
                (Arc::new(XlsxSource::new(path.clone())), "xlsx-file")
            }
        };

    // Create application state
    let state = AppState::new(
        oauth,
        sessions,
        states,
        deals,
        sheets,
        sheet_source_label,
        pool,
        config.clone(),
    );

    // Build HTTP router and serve
    let app = build_router(state, metrics_handle);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));

    tracing::info!("HTTP server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn build_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let request_timeout = state.request_timeout();

    // Auth routes
    let auth_routes = Router::new()
        .route("/auth/login", get(handlers::login))
        .route("/auth/callback", get(handlers::callback))
        .route("/auth/logout", get(handlers::logout))
        .route("/auth/me", get(handlers::me));

    // API v1 routes (handlers gate on the session cookie)
    let api_v1 = Router::new()
        .route("/sheets/data", get(handlers::get_sheet_data))
        .route("/sheets/clients", get(handlers::get_sheet_clients))
        .route(
            "/deals",
            get(handlers::list_deals).post(handlers::create_deal),
        )
        .route("/deals/summary", get(handlers::deal_summary))
        .route(
            "/deals/{id}",
            put(handlers::update_deal).delete(handlers::delete_deal),
        );

    // Health routes (no timeout - must always respond quickly)
    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready));

    // Metrics route (no timeout)
    let metrics_route = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    // Build middleware stack (order matters - outermost first)
    let middleware = ServiceBuilder::new()
        // Request ID propagation (outermost)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        // Tracing with request details
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // CORS
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        // Request timeout (innermost - closest to handler)
        .layer(TimeoutLayer::new(request_timeout));

    // Combine all routes
    Router::new()
        .nest("/api/v1", api_v1)
        .merge(auth_routes)
        .layer(middleware)
        .merge(health_routes) // Health routes without timeout
        .merge(metrics_route) // Metrics route without timeout
        .with_state(state)
}

fn setup_metrics() -> anyhow::Result<PrometheusHandle> {
    // Most operations are one DB round-trip; ingestion re-reads the whole
    // sheet and sits in the long tail
    let latency_buckets = &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0];

    let builder = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("deal_operation_duration_seconds".to_string()),
            latency_buckets,
        )?
        .set_buckets_for_metric(
            Matcher::Full("sheet_ingest_duration_seconds".to_string()),
            latency_buckets,
        )?;

    let handle = builder.install_recorder()?;

    metrics::describe_counter!("auth_logins_total", "Total sessions established");
    metrics::describe_counter!("deals_created_total", "Total deals created");
    metrics::describe_counter!("deals_deleted_total", "Total deals deleted");
    metrics::describe_histogram!(
        "deal_operation_duration_seconds",
        "Deal operation latency in seconds by operation type"
    );
    metrics::describe_histogram!(
        "sheet_ingest_duration_seconds",
        "Sheet fetch + ingestion latency in seconds"
    );

    Ok(handle)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
