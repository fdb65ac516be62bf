//! PostgreSQL deal repository implementation

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::models::DealRow;
use crate::repo::{CreateDeal, DealRepository, UpdateDeal};

const DEAL_COLUMNS: &str = "id, status, service_type, customer, location, size, \
     cost_or_budget, revenue_from_owner, revenue_from_tenant, total_revenue, \
     notes, start_date, payment_date, closed_date, created_by, created_at";

/// PostgreSQL deal repository
#[derive(Clone)]
pub struct PgDealRepository {
    pool: PgPool,
}

impl PgDealRepository {
    /// Create a new deal repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DealRepository for PgDealRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<DealRow>> {
        let deal = sqlx::query_as::<_, DealRow>(&format!(
            "SELECT {DEAL_COLUMNS} FROM deals WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(deal)
    }

    async fn list_for(&self, created_by: &str) -> DbResult<Vec<DealRow>> {
        let deals = sqlx::query_as::<_, DealRow>(&format!(
            "SELECT {DEAL_COLUMNS} FROM deals WHERE created_by = $1 ORDER BY created_at DESC"
        ))
        .bind(created_by)
        .fetch_all(&self.pool)
        .await?;

        Ok(deals)
    }

    async fn list_all(&self) -> DbResult<Vec<DealRow>> {
        let deals = sqlx::query_as::<_, DealRow>(&format!(
            "SELECT {DEAL_COLUMNS} FROM deals ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(deals)
    }

    async fn insert(&self, deal: CreateDeal) -> DbResult<DealRow> {
        let row = sqlx::query_as::<_, DealRow>(&format!(
            r#"
            INSERT INTO deals (id, status, service_type, customer, location, size,
                               cost_or_budget, revenue_from_owner, revenue_from_tenant,
                               total_revenue, notes, start_date, payment_date,
                               closed_date, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING {DEAL_COLUMNS}
            "#
        ))
        .bind(deal.id)
        .bind(&deal.status)
        .bind(&deal.service_type)
        .bind(&deal.customer)
        .bind(&deal.location)
        .bind(deal.size)
        .bind(deal.cost_or_budget)
        .bind(deal.revenue_from_owner)
        .bind(deal.revenue_from_tenant)
        .bind(deal.total_revenue)
        .bind(&deal.notes)
        .bind(deal.start_date)
        .bind(deal.payment_date)
        .bind(deal.closed_date)
        .bind(&deal.created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update(&self, id: Uuid, deal: UpdateDeal) -> DbResult<DealRow> {
        let row = sqlx::query_as::<_, DealRow>(&format!(
            r#"
            UPDATE deals
            SET status = $2, service_type = $3, customer = $4, location = $5,
                size = $6, cost_or_budget = $7, revenue_from_owner = $8,
                revenue_from_tenant = $9, total_revenue = $10, notes = $11,
                start_date = $12, payment_date = $13, closed_date = $14
            WHERE id = $1
            RETURNING {DEAL_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&deal.status)
        .bind(&deal.service_type)
        .bind(&deal.customer)
        .bind(&deal.location)
        .bind(deal.size)
        .bind(deal.cost_or_budget)
        .bind(deal.revenue_from_owner)
        .bind(deal.revenue_from_tenant)
        .bind(deal.total_revenue)
        .bind(&deal.notes)
        .bind(deal.start_date)
        .bind(deal.payment_date)
        .bind(deal.closed_date)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(DbError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM deals WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }

    async fn count_with_status(&self, created_by: &str, status: &str) -> DbResult<i64> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM deals WHERE created_by = $1 AND status = $2",
        )
        .bind(created_by)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    async fn revenue_for(
        &self,
        created_by: &str,
        status: &str,
        closed_between: Option<(NaiveDate, NaiveDate)>,
    ) -> DbResult<f64> {
        let total: (Option<f64>,) = match closed_between {
            Some((from, to)) => {
                sqlx::query_as(
                    r#"
                    SELECT SUM(total_revenue) FROM deals
                    WHERE created_by = $1 AND status = $2
                      AND closed_date >= $3 AND closed_date <= $4
                    "#,
                )
                .bind(created_by)
                .bind(status)
                .bind(from)
                .bind(to)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(
                    "SELECT SUM(total_revenue) FROM deals WHERE created_by = $1 AND status = $2",
                )
                .bind(created_by)
                .bind(status)
                .fetch_one(&self.pool)
                .await?
            }
        };

        Ok(total.0.unwrap_or(0.0))
    }
}
