//! Tests for pagination module

use super::*;
use crate::error::{Error, Result};
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use test_case::test_case;
use tokio_test::{assert_err, assert_ok};

// ============================================================================
// Fake upstream
// ============================================================================

/// In-memory upstream holding listings 0..n
#[derive(Default)]
struct FakeService {
    listings: Vec<u32>,
    reported_total: Option<u64>,
    fail_at: Option<u64>,
    reverse_completion: bool,
    follow_up_delay: Option<Duration>,
    requested: Mutex<Vec<u64>>,
    completed: Mutex<Vec<u64>>,
    finished: AtomicUsize,
}

impl FakeService {
    fn with_listings(n: u32) -> Self {
        Self {
            listings: (0..n).collect(),
            ..Default::default()
        }
    }

    fn reporting_total(mut self, total: u64) -> Self {
        self.reported_total = Some(total);
        self
    }

    fn failing_at(mut self, offset: u64) -> Self {
        self.fail_at = Some(offset);
        self
    }

    fn completing_in_reverse(mut self) -> Self {
        self.reverse_completion = true;
        self
    }

    fn slow_follow_ups(mut self, delay: Duration) -> Self {
        self.follow_up_delay = Some(delay);
        self
    }

    fn requested(&self) -> Vec<u64> {
        self.requested.lock().unwrap().clone()
    }

    fn completed(&self) -> Vec<u64> {
        self.completed.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchService for FakeService {
    type Item = u32;

    async fn search(&self, query: &SearchQuery, offset: u64) -> Result<Page<u32>> {
        self.requested.lock().unwrap().push(offset);

        if offset > 0 {
            if let Some(delay) = self.follow_up_delay {
                tokio::time::sleep(delay).await;
            }
        }
        if self.reverse_completion {
            let index = offset / u64::from(query.page_limit);
            tokio::time::sleep(Duration::from_millis(60 - index * 10)).await;
        }

        if self.fail_at == Some(offset) {
            return Err(Error::http_status(500, "boom"));
        }

        let start = (offset as usize).min(self.listings.len());
        let end = (start + query.page_limit as usize).min(self.listings.len());
        let total = self
            .reported_total
            .unwrap_or(self.listings.len() as u64);

        self.completed.lock().unwrap().push(offset);
        self.finished.fetch_add(1, Ordering::SeqCst);
        Ok(Page::new(self.listings[start..end].to_vec(), total))
    }
}

fn query(page_limit: u32) -> SearchQuery {
    SearchQuery::new("lunch", "40.7128", "-74.0060").with_page_limit(page_limit)
}

// ============================================================================
// SearchQuery Tests
// ============================================================================

#[test]
fn test_search_query_defaults() {
    let q = SearchQuery::new("lunch", "1.0", "2.0");
    assert_eq!(q.radius_meters, 1000);
    assert_eq!(q.page_limit, 50);
    assert_ok!(q.validate());
}

#[test_case("lunch", "91", "0" ; "latitude out of range")]
#[test_case("lunch", "0", "-180.5" ; "longitude out of range")]
#[test_case("lunch", "north", "0" ; "latitude not numeric")]
#[test_case("lunch", "0", "" ; "longitude empty")]
fn test_search_query_rejects_bad_coordinates(term: &str, lat: &str, lon: &str) {
    let err = assert_err!(SearchQuery::new(term, lat, lon).validate());
    assert!(matches!(err, Error::InvalidQuery { .. }));
}

#[test]
fn test_search_query_rejects_zero_page_limit() {
    let err = assert_err!(query(0).validate());
    assert!(err.to_string().contains("page limit"));
}

// ============================================================================
// OffsetPlan Tests
// ============================================================================

// Table cases compare with the std assert_eq the macro generates.
mod offset_plan_table {
    use super::OffsetPlan;
    use test_case::test_case;

    #[test_case(20, 20, 20, 3 => Vec::<u64>::new() ; "first page is everything")]
    #[test_case(20, 20, 45, 3 => vec![20, 40] ; "two more pages within budget")]
    #[test_case(20, 20, 45, 2 => vec![20] ; "budget allows one more page")]
    #[test_case(20, 20, 45, 1 => Vec::<u64>::new() ; "budget of one call")]
    #[test_case(20, 20, 500, 5 => vec![20, 40, 60, 80] ; "large total capped by budget")]
    #[test_case(50, 3, 3, 5 => Vec::<u64>::new() ; "short first page")]
    #[test_case(20, 0, 0, 5 => Vec::<u64>::new() ; "no results at all")]
    #[test_case(10, 10, 11, 5 => vec![10] ; "single straggler")]
    fn test_offset_plan(page_limit: u32, first: usize, total: u64, max_calls: u32) -> Vec<u64> {
        OffsetPlan::new(first, total, page_limit, max_calls).offsets
    }
}

#[test]
fn test_offset_plan_reports_skipped_pages() {
    let plan = OffsetPlan::new(20, 45, 20, 2);
    assert_eq!(plan.pages_needed, 2);
    assert_eq!(plan.pages_skipped(), 1);
    assert!(plan.is_truncated());

    let plan = OffsetPlan::new(20, 45, 20, 3);
    assert_eq!(plan.pages_skipped(), 0);
    assert!(!plan.is_truncated());
}

#[test]
fn test_offset_plan_zero_budget_plans_nothing() {
    let plan = OffsetPlan::new(20, 100, 20, 0);
    assert!(plan.offsets.is_empty());
    assert_eq!(plan.pages_needed, 4);
}

// ============================================================================
// PaginatedFetcher Tests
// ============================================================================

#[tokio::test]
async fn test_fetch_single_page_issues_no_extra_calls() {
    let fetcher = PaginatedFetcher::new(FakeService::with_listings(20)).with_max_calls(3);

    let outcome = fetcher.fetch(&query(20)).await.unwrap();

    assert_eq!(fetcher.service().requested(), vec![0]);
    assert_eq!(outcome.items, (0..20).collect::<Vec<_>>());
    assert_eq!(outcome.calls_made, 1);
    assert!(outcome.is_complete());
}

#[tokio::test]
async fn test_fetch_all_pages_within_budget() {
    let fetcher = PaginatedFetcher::new(FakeService::with_listings(45)).with_max_calls(3);

    let outcome = fetcher.fetch(&query(20)).await.unwrap();

    let mut requested = fetcher.service().requested();
    requested.sort_unstable();
    assert_eq!(requested, vec![0, 20, 40]);
    assert_eq!(outcome.len(), 45);
    assert_eq!(outcome.items, (0..45).collect::<Vec<_>>());
    assert_eq!(outcome.total_available, 45);
    assert_eq!(outcome.calls_made, 3);
    assert!(outcome.is_complete());
}

#[tokio::test]
async fn test_fetch_truncates_when_budget_exhausted() {
    let fetcher = PaginatedFetcher::new(FakeService::with_listings(45)).with_max_calls(2);

    let outcome = fetcher.fetch(&query(20)).await.unwrap();

    assert_eq!(fetcher.service().requested(), vec![0, 20]);
    assert_eq!(outcome.len(), 40);
    assert_eq!(outcome.items, (0..40).collect::<Vec<_>>());
    assert_eq!(outcome.calls_made, 2);
    assert_eq!(outcome.pages_skipped, 1);
    assert!(!outcome.is_complete());
}

#[tokio::test]
async fn test_fetch_large_total_never_exceeds_budget() {
    let service = FakeService::with_listings(1000);
    let fetcher = PaginatedFetcher::new(service).with_max_calls(4);

    let outcome = fetcher.fetch(&query(20)).await.unwrap();

    assert_eq!(fetcher.service().requested().len(), 4);
    assert_eq!(outcome.len(), 80);
    assert!(outcome.len() <= 20 * 4);
    assert_eq!(outcome.pages_skipped, 49 - 3);
}

#[tokio::test(start_paused = true)]
async fn test_fetch_orders_by_offset_not_completion() {
    let service = FakeService::with_listings(100).completing_in_reverse();
    let fetcher = PaginatedFetcher::new(service).with_max_calls(5);

    let outcome = fetcher.fetch(&query(20)).await.unwrap();

    // Later offsets finished first...
    assert_eq!(fetcher.service().completed(), vec![0, 80, 60, 40, 20]);
    // ...but the outcome is still in offset order.
    assert_eq!(outcome.items, (0..100).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_fetch_follow_ups_run_concurrently() {
    let service = FakeService::with_listings(100).slow_follow_ups(Duration::from_millis(200));
    let fetcher = PaginatedFetcher::new(service).with_max_calls(5);

    let started = std::time::Instant::now();
    let outcome = fetcher.fetch(&query(20)).await.unwrap();

    assert_eq!(outcome.len(), 100);
    // Four sequential follow-ups would take 800ms.
    assert!(started.elapsed() < Duration::from_millis(600));
}

#[tokio::test]
async fn test_fetch_last_page_short() {
    let fetcher = PaginatedFetcher::new(FakeService::with_listings(45)).with_max_calls(3);

    let outcome = fetcher.fetch(&query(20)).await.unwrap();

    assert_eq!(&outcome.items[40..], &[40, 41, 42, 43, 44]);
}

#[tokio::test]
async fn test_fetch_accepts_drifting_total() {
    // Upstream claims 60 but only holds 45: the missing tail is accepted as is.
    let service = FakeService::with_listings(45).reporting_total(60);
    let fetcher = PaginatedFetcher::new(service).with_max_calls(5);

    let outcome = fetcher.fetch(&query(20)).await.unwrap();

    assert_eq!(outcome.len(), 45);
    assert_eq!(outcome.total_available, 60);
    assert!(outcome.is_complete());
}

#[tokio::test]
async fn test_fetch_fails_when_any_page_fails() {
    let service = FakeService::with_listings(100).failing_at(40);
    let fetcher = PaginatedFetcher::new(service).with_max_calls(5);

    let err = fetcher.fetch(&query(20)).await.unwrap_err();

    assert!(err.is_upstream());
    assert!(matches!(err, Error::HttpStatus { status: 500, .. }));
}

#[tokio::test]
async fn test_fetch_fails_when_first_page_fails() {
    let service = FakeService::with_listings(100).failing_at(0);
    let fetcher = PaginatedFetcher::new(service);

    let err = fetcher.fetch(&query(20)).await.unwrap_err();

    assert!(err.is_upstream());
    assert_eq!(fetcher.service().requested(), vec![0]);
}

#[tokio::test]
async fn test_fetch_rejects_zero_page_limit_before_calling() {
    let fetcher = PaginatedFetcher::new(FakeService::with_listings(10));

    let err = fetcher.fetch(&query(0)).await.unwrap_err();

    assert!(matches!(err, Error::InvalidQuery { .. }));
    assert!(fetcher.service().requested().is_empty());
}

#[tokio::test]
async fn test_fetch_rejects_zero_budget_before_calling() {
    let fetcher = PaginatedFetcher::new(FakeService::with_listings(10)).with_max_calls(0);

    let err = fetcher.fetch(&query(20)).await.unwrap_err();

    assert!(matches!(err, Error::Config { .. }));
    assert!(fetcher.service().requested().is_empty());
}

#[tokio::test]
async fn test_fetch_is_idempotent() {
    let fetcher = PaginatedFetcher::new(FakeService::with_listings(73)).with_max_calls(3);

    let first = fetcher.fetch(&query(20)).await.unwrap();
    let second = fetcher.fetch(&query(20)).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_dropped_fetch_cancels_in_flight_pages() {
    let service = FakeService::with_listings(100).slow_follow_ups(Duration::from_secs(5));
    let fetcher = PaginatedFetcher::new(service).with_max_calls(5);

    let result = tokio::time::timeout(Duration::from_millis(100), fetcher.fetch(&query(20))).await;
    assert!(result.is_err());

    // Only the first page finished; follow-ups were dropped mid-flight.
    assert_eq!(fetcher.service().finished.load(Ordering::SeqCst), 1);
    assert_eq!(fetcher.service().requested().len(), 5);
}

#[tokio::test]
async fn test_fetch_through_shared_service() {
    let service = Arc::new(FakeService::with_listings(30));
    let fetcher = PaginatedFetcher::new(Arc::clone(&service)).with_max_calls(2);

    let outcome = fetcher.fetch(&query(20)).await.unwrap();

    assert_eq!(outcome.len(), 30);
    assert_eq!(service.requested().len(), 2);
}

#[test]
fn test_fetch_outcome_into_items() {
    let outcome = FetchOutcome {
        items: vec!["a", "b"],
        total_available: 2,
        calls_made: 1,
        pages_skipped: 0,
    };
    assert!(!outcome.is_empty());
    assert_eq!(outcome.into_items(), vec!["a", "b"]);
}
