//! Repository traits
//!
//! Define async repository interfaces for database operations.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::*;

/// Deal repository trait
#[async_trait]
pub trait DealRepository: Send + Sync {
    /// Find a deal by ID
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<DealRow>>;

    /// List deals created by one user, newest first
    async fn list_for(&self, created_by: &str) -> DbResult<Vec<DealRow>>;

    /// List every deal, newest first (admin view)
    async fn list_all(&self) -> DbResult<Vec<DealRow>>;

    /// Create a new deal
    async fn insert(&self, deal: CreateDeal) -> DbResult<DealRow>;

    /// Update an existing deal
    async fn update(&self, id: Uuid, deal: UpdateDeal) -> DbResult<DealRow>;

    /// Delete a deal
    async fn delete(&self, id: Uuid) -> DbResult<()>;

    /// Count a user's deals in a given status
    async fn count_with_status(&self, created_by: &str, status: &str) -> DbResult<i64>;

    /// Sum `total_revenue` over a user's deals in a given status,
    /// optionally bounded by `closed_date`
    async fn revenue_for(
        &self,
        created_by: &str,
        status: &str,
        closed_between: Option<(NaiveDate, NaiveDate)>,
    ) -> DbResult<f64>;
}

/// Create deal input
#[derive(Debug, Clone)]
pub struct CreateDeal {
    pub id: Uuid,
    pub status: String,
    pub service_type: String,
    pub customer: String,
    pub location: String,
    pub size: f64,
    pub cost_or_budget: f64,
    pub revenue_from_owner: f64,
    pub revenue_from_tenant: f64,
    pub total_revenue: f64,
    pub notes: String,
    pub start_date: NaiveDate,
    pub payment_date: Option<NaiveDate>,
    pub closed_date: Option<NaiveDate>,
    pub created_by: String,
}

/// Update deal input (`created_by` is immutable by design)
#[derive(Debug, Clone)]
pub struct UpdateDeal {
    pub status: String,
    pub service_type: String,
    pub customer: String,
    pub location: String,
    pub size: f64,
    pub cost_or_budget: f64,
    pub revenue_from_owner: f64,
    pub revenue_from_tenant: f64,
    pub total_revenue: f64,
    pub notes: String,
    pub start_date: NaiveDate,
    pub payment_date: Option<NaiveDate>,
    pub closed_date: Option<NaiveDate>,
}

/// Team allowlist repository trait
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Check whether an email is on the authorized-team allowlist
    async fn is_member(&self, email: &str) -> DbResult<bool>;

    /// List all allowlisted members
    async fn list(&self) -> DbResult<Vec<TeamMemberRow>>;
}
