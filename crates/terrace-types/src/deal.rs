//! Deal types
//!
//! A deal is a persisted sales-pipeline record. Status changes carry date
//! side effects: closing a deal stamps `closed_date`, moving it to payment
//! pending stamps `payment_date`, and reactivating clears both.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique deal identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DealId(pub Uuid);

impl DealId {
    /// Create a new random deal ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a deal ID from a string
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for DealId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DealId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for DealId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Deal status lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DealStatus {
    Active,
    #[serde(rename = "Payment Pending")]
    PaymentPending,
    Closed,
    Cancelled,
}

impl DealStatus {
    /// Whether this status ends the deal's lifecycle
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed | Self::Cancelled)
    }

    /// Wire/database representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::PaymentPending => "Payment Pending",
            Self::Closed => "Closed",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for DealStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DealStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(Self::Active),
            "Payment Pending" => Ok(Self::PaymentPending),
            "Closed" => Ok(Self::Closed),
            "Cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown deal status: {other}")),
        }
    }
}

/// Which side of the transaction the brokerage represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceType {
    Owner,
    Tenant,
}

impl ServiceType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "Owner",
            Self::Tenant => "Tenant",
        }
    }
}

impl std::fmt::Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ServiceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Owner" => Ok(Self::Owner),
            "Tenant" => Ok(Self::Tenant),
            other => Err(format!("unknown service type: {other}")),
        }
    }
}

/// A persisted deal record
///
/// `created_by` is stamped once at creation with the authenticated caller's
/// email and acts as the access-control scope key from then on.
/// `total_revenue` is always server-computed from the two revenue fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deal {
    pub id: DealId,
    pub status: DealStatus,
    pub service_type: ServiceType,
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

/// Apply the date side effects of a status.
///
/// Returns the `(payment_date, closed_date)` pair that should be persisted
/// alongside `status`. Terminal statuses fill `closed_date` with `today`
/// only when it is absent; an existing date is never overwritten. Payment
/// pending fills `payment_date` the same way. Active clears both.
pub fn apply_status_dates(
    status: DealStatus,
    payment_date: Option<NaiveDate>,
    closed_date: Option<NaiveDate>,
    today: NaiveDate,
) -> (Option<NaiveDate>, Option<NaiveDate>) {
    match status {
        DealStatus::Active => (None, None),
        DealStatus::PaymentPending => (payment_date.or(Some(today)), closed_date),
        DealStatus::Closed | DealStatus::Cancelled => {
            (payment_date, closed_date.or(Some(today)))
        }
    }
}
