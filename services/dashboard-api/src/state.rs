//! Application state

use std::ops::Deref;
use std::sync::Arc;

use terrace_auth_core::{OAuthClient, SessionManager, StateManager};
use terrace_db::pg::{PgDealRepository, PgTeamRepository};
use terrace_db::DbPool;
use terrace_deals_core::DealService;
use terrace_ingest::{RowSource, SheetSchema};

use crate::config::Config;

/// Type alias for the deal service with concrete repository types
pub type DealServiceImpl = DealService<PgDealRepository, PgTeamRepository>;

/// Shared database pool wrapper for health checks
#[derive(Clone)]
pub struct SharedPool(Arc<DbPool>);

impl Deref for SharedPool {
    type Target = DbPool;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// OAuth provider client
    pub oauth: Arc<OAuthClient>,
    /// Session cookie signing/verification
    pub sessions: Arc<SessionManager>,
    /// CSRF state token signing/verification
    pub states: Arc<StateManager>,
    /// Deal business logic
    pub deals: Arc<DealServiceImpl>,
    /// Sheet row source
    pub sheets: Arc<dyn RowSource>,
    /// Which source is configured, reported in the ingestion envelope
    pub sheet_source_label: &'static str,
    /// Positional column schema for the configured sheet
    pub sheet_schema: Arc<SheetSchema>,
    /// Database connection pool (shared reference for health checks)
    pub pool: SharedPool,
    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        oauth: OAuthClient,
        sessions: SessionManager,
        states: StateManager,
        deals: DealServiceImpl,
        sheets: Arc<dyn RowSource>,
        sheet_source_label: &'static str,
        pool: DbPool,
        config: Config,
    ) -> Self {
        Self {
            oauth: Arc::new(oauth),
            sessions: Arc::new(sessions),
            states: Arc::new(states),
            deals: Arc::new(deals),
            sheets,
            sheet_source_label,
            sheet_schema: Arc::new(SheetSchema::v1()),
            pool: SharedPool(Arc::new(pool)),
            config: Arc::new(config),
        }
    }

    /// Get request timeout from config
    pub fn request_timeout(&self) -> std::time::Duration {
        self.config.request_timeout
    }
}
