//! Database row models
//!
//! These types map directly to database rows using SQLx's FromRow derive.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use terrace_types::{Deal, DealId, DealStatus, ServiceType};

/// Deal row from the database
#[derive(Debug, Clone, FromRow)]
pub struct DealRow {
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
    pub created_at: DateTime<Utc>,
}

/// Team allowlist row from the database
#[derive(Debug, Clone, FromRow)]
pub struct TeamMemberRow {
    pub email: String,
    pub added_at: DateTime<Utc>,
}

impl DealRow {
    /// Convert to domain DealId
    pub fn deal_id(&self) -> DealId {
        DealId(self.id)
    }

    /// Convert to the domain deal type.
    ///
    /// Status and service type are constrained by the schema; rows that
    /// somehow predate a constraint fall back to the default variants.
    pub fn into_deal(self) -> Deal {
        Deal {
            id: DealId(self.id),
            status: self.status.parse().unwrap_or(DealStatus::Active),
            service_type: self.service_type.parse().unwrap_or(ServiceType::Owner),
            customer: self.customer,
            location: self.location,
            size: self.size,
            cost_or_budget: self.cost_or_budget,
            revenue_from_owner: self.revenue_from_owner,
            revenue_from_tenant: self.revenue_from_tenant,
            total_revenue: self.total_revenue,
            notes: self.notes,
            start_date: self.start_date,
            payment_date: self.payment_date,
            closed_date: self.closed_date,
            created_by: self.created_by,
            created_at: self.created_at,
        }
    }
}
