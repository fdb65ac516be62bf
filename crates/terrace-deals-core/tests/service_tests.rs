//! Deal service integration tests over in-memory repositories

mod common;

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use common::mock_repos::{MockDealRepository, MockTeamRepository};
use terrace_deals_core::{DealError, DealInput, DealService, DealsConfig};
use terrace_types::{DealStatus, ServiceType};

const ADMIN: &str = "admin@terrace.example";
const JANE: &str = "jane@terrace.example";
const BOB: &str = "bob@terrace.example";

fn service() -> (
    DealService<MockDealRepository, MockTeamRepository>,
    MockDealRepository,
    MockTeamRepository,
) {
    let deals = MockDealRepository::new();
    let team = MockTeamRepository::new();
    let service = DealService::new(
        Arc::new(deals.clone()),
        Arc::new(team.clone()),
        DealsConfig::default(),
    );
    (service, deals, team)
}

fn input() -> DealInput {
    DealInput {
        status: DealStatus::Active,
        service_type: ServiceType::Owner,
        customer: "Acme Warehousing".to_string(),
        location: "Whitefield, Bengaluru".to_string(),
        size: 2000.0,
        cost_or_budget: 50.0,
        revenue_from_owner: 120_000.0,
        revenue_from_tenant: 30_000.0,
        notes: "2000 sq ft, ground floor".to_string(),
        start_date: None,
        payment_date: None,
        closed_date: None,
    }
}

#[tokio::test]
async fn allowlist_miss_fails_closed() {
    let (service, _, team) = service();
    team.allow(JANE);

    // Bob is not on the team: every operation is denied
    assert!(matches!(
        service.list(BOB).await,
        Err(DealError::NotAuthorized)
    ));
    assert!(matches!(
        service.create(BOB, input()).await,
        Err(DealError::NotAuthorized)
    ));
    assert!(matches!(
        service.summary(BOB).await,
        Err(DealError::NotAuthorized)
    ));
}

#[tokio::test]
async fn create_stamps_owner_and_computes_total() {
    let (service, _, team) = service();
    team.allow(JANE);

    let deal = service.create(JANE, input()).await.unwrap();
    assert_eq!(deal.created_by, JANE);
    assert_eq!(deal.total_revenue, 150_000.0);
    assert_eq!(deal.status, DealStatus::Active);
    // Active deals carry no lifecycle dates
    assert_eq!(deal.payment_date, None);
    assert_eq!(deal.closed_date, None);
    // Start date defaults to today
    assert_eq!(deal.start_date, Utc::now().date_naive());
}

#[tokio::test]
async fn create_requires_customer_and_location() {
    let (service, _, team) = service();
    team.allow(JANE);

    let bad = DealInput {
        customer: "  ".to_string(),
        ..input()
    };
    assert!(matches!(
        service.create(JANE, bad).await,
        Err(DealError::Validation(_))
    ));
}

#[tokio::test]
async fn closing_fills_closed_date_once() {
    let (service, _, team) = service();
    team.allow(JANE);

    let deal = service.create(JANE, input()).await.unwrap();

    let closed = service
        .update(
            JANE,
            deal.id,
            DealInput {
                status: DealStatus::Closed,
                ..input()
            },
        )
        .await
        .unwrap();
    assert_eq!(closed.closed_date, Some(Utc::now().date_naive()));

    // A later update while closed must not move the date
    let earlier = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    let reclose = service
        .update(
            JANE,
            deal.id,
            DealInput {
                status: DealStatus::Closed,
                closed_date: Some(earlier),
                notes: "renegotiated".to_string(),
                ..input()
            },
        )
        .await
        .unwrap();
    assert_eq!(reclose.closed_date, Some(earlier));

    let touch_again = service
        .update(
            JANE,
            deal.id,
            DealInput {
                status: DealStatus::Closed,
                ..input()
            },
        )
        .await
        .unwrap();
    assert_eq!(touch_again.closed_date, Some(earlier));
}

#[tokio::test]
async fn payment_pending_fills_payment_date() {
    let (service, _, team) = service();
    team.allow(JANE);

    let deal = service.create(JANE, input()).await.unwrap();
    let pending = service
        .update(
            JANE,
            deal.id,
            DealInput {
                status: DealStatus::PaymentPending,
                ..input()
            },
        )
        .await
        .unwrap();
    assert_eq!(pending.payment_date, Some(Utc::now().date_naive()));
    assert_eq!(pending.closed_date, None);
}

#[tokio::test]
async fn reactivating_clears_dates() {
    let (service, _, team) = service();
    team.allow(JANE);

    let deal = service.create(JANE, input()).await.unwrap();
    service
        .update(
            JANE,
            deal.id,
            DealInput {
                status: DealStatus::Closed,
                ..input()
            },
        )
        .await
        .unwrap();

    let reopened = service
        .update(
            JANE,
            deal.id,
            DealInput {
                status: DealStatus::Active,
                ..input()
            },
        )
        .await
        .unwrap();
    assert_eq!(reopened.payment_date, None);
    assert_eq!(reopened.closed_date, None);
}

#[tokio::test]
async fn non_owner_cannot_update_or_delete() {
    let (service, _, team) = service();
    team.allow(JANE);
    team.allow(BOB);

    let deal = service.create(JANE, input()).await.unwrap();

    assert!(matches!(
        service.update(BOB, deal.id, input()).await,
        Err(DealError::NotOwner)
    ));
    assert!(matches!(
        service.delete(BOB, deal.id).await,
        Err(DealError::NotOwner)
    ));
}

#[tokio::test]
async fn admin_overrides_ownership() {
    let (service, repo, team) = service();
    team.allow(JANE);
    team.allow(ADMIN);

    let deal = service.create(JANE, input()).await.unwrap();
    service.delete(ADMIN, deal.id).await.unwrap();
    assert_eq!(repo.len(), 0);
}

#[tokio::test]
async fn list_is_scoped_to_caller() {
    let (service, _, team) = service();
    team.allow(JANE);
    team.allow(BOB);
    team.allow(ADMIN);

    service.create(JANE, input()).await.unwrap();
    service.create(BOB, input()).await.unwrap();

    let janes = service.list(JANE).await.unwrap();
    assert_eq!(janes.len(), 1);
    assert_eq!(janes[0].created_by, JANE);

    // The admin sees everything
    let all = service.list(ADMIN).await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn delete_of_missing_deal_is_not_found() {
    let (service, _, team) = service();
    team.allow(JANE);

    assert!(matches!(
        service.delete(JANE, terrace_types::DealId::new()).await,
        Err(DealError::NotFound)
    ));
}

#[tokio::test]
async fn summary_counts_and_sums() {
    let (service, _, team) = service();
    team.allow(JANE);
    team.allow(BOB);

    service.create(JANE, input()).await.unwrap();
    let second = service.create(JANE, input()).await.unwrap();
    // Bob's deals never show up in Jane's summary
    service.create(BOB, input()).await.unwrap();

    // Close one of Jane's deals today: inside the current financial year
    service
        .update(
            JANE,
            second.id,
            DealInput {
                status: DealStatus::Closed,
                ..input()
            },
        )
        .await
        .unwrap();

    let summary = service.summary(JANE).await.unwrap();
    assert_eq!(summary.active_deals, 1);
    assert_eq!(summary.revenue_active, 150_000.0);
    assert_eq!(summary.revenue_closed, 150_000.0);
    assert!(summary.fy_start < summary.fy_end);
}
