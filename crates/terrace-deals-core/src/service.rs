//! Deal service - allowlist gate, ownership scoping, and lifecycle rules
//!
//! Every operation runs the caller through the team allowlist first and
//! fails closed on a miss. Ownership is keyed on `created_by`; the
//! configured admin identity overrides it. `total_revenue` is always
//! recomputed here - callers cannot supply it.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Utc};
use uuid::Uuid;

use terrace_db::{CreateDeal, DealRepository, TeamRepository, UpdateDeal};
use terrace_types::{apply_status_dates, Deal, DealId, DealStatus, ServiceType};

use crate::config::DealsConfig;
use crate::error::DealError;

/// Maximum length of the free-text notes field
pub const MAX_NOTES_LEN: usize = 500;

/// Caller-supplied deal fields, used for both create and update.
///
/// `created_by` and `total_revenue` are intentionally absent: the first is
/// stamped from the authenticated caller, the second is computed.
#[derive(Debug, Clone)]
pub struct DealInput {
    pub status: DealStatus,
    pub service_type: ServiceType,
    pub customer: String,
    pub location: String,
    pub size: f64,
    pub cost_or_budget: f64,
    pub revenue_from_owner: f64,
    pub revenue_from_tenant: f64,
    pub notes: String,
    pub start_date: Option<NaiveDate>,
    pub payment_date: Option<NaiveDate>,
    pub closed_date: Option<NaiveDate>,
}

/// Dashboard rollup for one user
#[derive(Debug, Clone, PartialEq)]
pub struct DealSummary {
    pub active_deals: i64,
    pub revenue_active: f64,
    /// Closed revenue within the current financial year
    pub revenue_closed: f64,
    pub fy_start: NaiveDate,
    pub fy_end: NaiveDate,
}

/// Deal service
pub struct DealService<D: DealRepository, T: TeamRepository> {
    deals: Arc<D>,
    team: Arc<T>,
    config: DealsConfig,
}

impl<D: DealRepository, T: TeamRepository> DealService<D, T> {
    /// Create a new deal service
    pub fn new(deals: Arc<D>, team: Arc<T>, config: DealsConfig) -> Self {
        Self {
            deals,
            team,
            config,
        }
    }

    /// List deals visible to the caller, newest first.
    ///
    /// Regular callers see only their own deals; the admin sees all.
    pub async fn list(&self, caller: &str) -> Result<Vec<Deal>, DealError> {
        self.authorize(caller).await?;

        let rows = if self.is_admin(caller) {
            self.deals.list_all().await?
        } else {
            self.deals.list_for(caller).await?
        };

        Ok(rows.into_iter().map(|r| r.into_deal()).collect())
    }

    /// Create a deal owned by the caller
    pub async fn create(&self, caller: &str, input: DealInput) -> Result<Deal, DealError> {
        self.authorize(caller).await?;
        let input = validate(input)?;

        let today = today();
        let (payment_date, closed_date) =
            apply_status_dates(input.status, input.payment_date, input.closed_date, today);

        let create = CreateDeal {
            id: Uuid::new_v4(),
            status: input.status.as_str().to_string(),
            service_type: input.service_type.as_str().to_string(),
            customer: input.customer,
            location: input.location,
            size: input.size,
            cost_or_budget: input.cost_or_budget,
            revenue_from_owner: input.revenue_from_owner,
            revenue_from_tenant: input.revenue_from_tenant,
            total_revenue: input.revenue_from_owner + input.revenue_from_tenant,
            notes: input.notes,
            start_date: input.start_date.unwrap_or(today),
            payment_date,
            closed_date,
            created_by: caller.to_string(),
        };

        let row = self.deals.insert(create).await?;
        tracing::info!(deal_id = %row.id, created_by = %caller, "deal created");
        Ok(row.into_deal())
    }

    /// Update a deal the caller owns (or any deal, for the admin)
    pub async fn update(
        &self,
        caller: &str,
        id: DealId,
        input: DealInput,
    ) -> Result<Deal, DealError> {
        self.authorize(caller).await?;

        let existing = self
            .deals
            .find_by_id(id.0)
            .await?
            .ok_or(DealError::NotFound)?;
        self.check_ownership(caller, &existing.created_by)?;

        let input = validate(input)?;

        // Explicit dates win; otherwise carry the stored ones forward so a
        // status change can fill or clear them.
        let payment_seed = input.payment_date.or(existing.payment_date);
        let closed_seed = input.closed_date.or(existing.closed_date);
        let (payment_date, closed_date) =
            apply_status_dates(input.status, payment_seed, closed_seed, today());

        let update = UpdateDeal {
            status: input.status.as_str().to_string(),
            service_type: input.service_type.as_str().to_string(),
            customer: input.customer,
            location: input.location,
            size: input.size,
            cost_or_budget: input.cost_or_budget,
            revenue_from_owner: input.revenue_from_owner,
            revenue_from_tenant: input.revenue_from_tenant,
            total_revenue: input.revenue_from_owner + input.revenue_from_tenant,
            notes: input.notes,
            start_date: input.start_date.unwrap_or(existing.start_date),
            payment_date,
            closed_date,
        };

        let row = self.deals.update(id.0, update).await?;
        tracing::info!(deal_id = %id, updated_by = %caller, "deal updated");
        Ok(row.into_deal())
    }

    /// Delete a deal the caller owns (or any deal, for the admin)
    pub async fn delete(&self, caller: &str, id: DealId) -> Result<(), DealError> {
        self.authorize(caller).await?;

        let existing = self
            .deals
            .find_by_id(id.0)
            .await?
            .ok_or(DealError::NotFound)?;
        self.check_ownership(caller, &existing.created_by)?;

        self.deals.delete(id.0).await?;
        tracing::info!(deal_id = %id, deleted_by = %caller, "deal deleted");
        Ok(())
    }

    /// Dashboard rollup: active-deal count plus active/closed revenue for
    /// the current financial year (April 1 – March 31)
    pub async fn summary(&self, caller: &str) -> Result<DealSummary, DealError> {
        self.authorize(caller).await?;

        let (fy_start, fy_end) = financial_year(today());

        let active_deals = self
            .deals
            .count_with_status(caller, DealStatus::Active.as_str())
            .await?;
        let revenue_active = self
            .deals
            .revenue_for(caller, DealStatus::Active.as_str(), None)
            .await?;
        let revenue_closed = self
            .deals
            .revenue_for(caller, DealStatus::Closed.as_str(), Some((fy_start, fy_end)))
            .await?;

        Ok(DealSummary {
            active_deals,
            revenue_active,
            revenue_closed,
            fy_start,
            fy_end,
        })
    }

    /// Team allowlist gate. A miss fails closed.
    async fn authorize(&self, caller: &str) -> Result<(), DealError> {
        if self.team.is_member(caller).await? {
            return Ok(());
        }
        tracing::warn!(caller = %caller, "deals access denied: not on team allowlist");
        Err(DealError::NotAuthorized)
    }

    fn check_ownership(&self, caller: &str, created_by: &str) -> Result<(), DealError> {
        if caller == created_by || self.is_admin(caller) {
            return Ok(());
        }
        tracing::warn!(caller = %caller, owner = %created_by, "deal ownership check failed");
        Err(DealError::NotOwner)
    }

    fn is_admin(&self, caller: &str) -> bool {
        caller == self.config.admin_email
    }
}

impl<D: DealRepository, T: TeamRepository> std::fmt::Debug for DealService<D, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DealService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Trim and validate caller-supplied fields
fn validate(mut input: DealInput) -> Result<DealInput, DealError> {
    input.customer = input.customer.trim().to_string();
    input.location = input.location.trim().to_string();
    input.notes = input.notes.trim().to_string();

    if input.customer.is_empty() {
        return Err(DealError::Validation("customer is required".to_string()));
    }
    if input.location.is_empty() {
        return Err(DealError::Validation("location is required".to_string()));
    }
    if input.notes.len() > MAX_NOTES_LEN {
        return Err(DealError::Validation(format!(
            "notes must be at most {MAX_NOTES_LEN} characters"
        )));
    }
    for (field, value) in [
        ("size", input.size),
        ("cost_or_budget", input.cost_or_budget),
        ("revenue_from_owner", input.revenue_from_owner),
        ("revenue_from_tenant", input.revenue_from_tenant),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(DealError::Validation(format!(
                "{field} must be a non-negative number"
            )));
        }
    }

    Ok(input)
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Financial year containing `date`: April 1 of the starting year through
/// March 31 of the next
pub fn financial_year(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start_year = if date.month() < 4 {
        date.year() - 1
    } else {
        date.year()
    };
    (
        NaiveDate::from_ymd_opt(start_year, 4, 1).expect("valid date"),
        NaiveDate::from_ymd_opt(start_year + 1, 3, 31).expect("valid date"),
    )
}
