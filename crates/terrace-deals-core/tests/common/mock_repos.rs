//! Mock repositories for testing

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

use terrace_db::{
    CreateDeal, DbError, DbResult, DealRepository, DealRow, TeamMemberRow, TeamRepository,
    UpdateDeal,
};

/// In-memory deal repository for testing
#[derive(Default, Clone)]
pub struct MockDealRepository {
    deals: Arc<DashMap<Uuid, DealRow>>,
    // Monotonic tiebreaker so created_at ordering is deterministic
    seq: Arc<AtomicI64>,
}

impl MockDealRepository {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.deals.len()
    }
}

#[async_trait]
impl DealRepository for MockDealRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<DealRow>> {
        Ok(self.deals.get(&id).map(|r| r.value().clone()))
    }

    async fn list_for(&self, created_by: &str) -> DbResult<Vec<DealRow>> {
        let mut rows: Vec<DealRow> = self
            .deals
            .iter()
            .filter(|r| r.value().created_by == created_by)
            .map(|r| r.value().clone())
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn list_all(&self) -> DbResult<Vec<DealRow>> {
        let mut rows: Vec<DealRow> = self.deals.iter().map(|r| r.value().clone()).collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn insert(&self, deal: CreateDeal) -> DbResult<DealRow> {
        let offset = self.seq.fetch_add(1, Ordering::SeqCst);
        let row = DealRow {
            id: deal.id,
            status: deal.status,
            service_type: deal.service_type,
            customer: deal.customer,
            location: deal.location,
            size: deal.size,
            cost_or_budget: deal.cost_or_budget,
            revenue_from_owner: deal.revenue_from_owner,
            revenue_from_tenant: deal.revenue_from_tenant,
            total_revenue: deal.total_revenue,
            notes: deal.notes,
            start_date: deal.start_date,
            payment_date: deal.payment_date,
            closed_date: deal.closed_date,
            created_by: deal.created_by,
            created_at: Utc::now() + chrono::Duration::milliseconds(offset),
        };
        self.deals.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(&self, id: Uuid, deal: UpdateDeal) -> DbResult<DealRow> {
        let mut row = self.deals.get_mut(&id).ok_or(DbError::NotFound)?;
        row.status = deal.status;
        row.service_type = deal.service_type;
        row.customer = deal.customer;
        row.location = deal.location;
        row.size = deal.size;
        row.cost_or_budget = deal.cost_or_budget;
        row.revenue_from_owner = deal.revenue_from_owner;
        row.revenue_from_tenant = deal.revenue_from_tenant;
        row.total_revenue = deal.total_revenue;
        row.notes = deal.notes;
        row.start_date = deal.start_date;
        row.payment_date = deal.payment_date;
        row.closed_date = deal.closed_date;
        Ok(row.value().clone())
    }

    async fn delete(&self, id: Uuid) -> DbResult<()> {
        self.deals.remove(&id).map(|_| ()).ok_or(DbError::NotFound)
    }

    async fn count_with_status(&self, created_by: &str, status: &str) -> DbResult<i64> {
        Ok(self
            .deals
            .iter()
            .filter(|r| r.value().created_by == created_by && r.value().status == status)
            .count() as i64)
    }

    async fn revenue_for(
        &self,
        created_by: &str,
        status: &str,
        closed_between: Option<(NaiveDate, NaiveDate)>,
    ) -> DbResult<f64> {
        Ok(self
            .deals
            .iter()
            .filter(|r| {
                let row = r.value();
                if row.created_by != created_by || row.status != status {
                    return false;
                }
                match closed_between {
                    None => true,
                    Some((from, to)) => row
                        .closed_date
                        .map(|d| d >= from && d <= to)
                        .unwrap_or(false),
                }
            })
            .map(|r| r.value().total_revenue)
            .sum())
    }
}

/// In-memory team allowlist for testing
#[derive(Default, Clone)]
pub struct MockTeamRepository {
    members: Arc<DashMap<String, TeamMemberRow>>,
}

impl MockTeamRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an email to the allowlist
    pub fn allow(&self, email: &str) {
        self.members.insert(
            email.to_string(),
            TeamMemberRow {
                email: email.to_string(),
                added_at: Utc::now(),
            },
        );
    }
}

#[async_trait]
impl TeamRepository for MockTeamRepository {
    async fn is_member(&self, email: &str) -> DbResult<bool> {
        Ok(self.members.contains_key(email))
    }

    async fn list(&self) -> DbResult<Vec<TeamMemberRow>> {
        Ok(self.members.iter().map(|r| r.value().clone()).collect())
    }
}
