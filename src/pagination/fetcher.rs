//! Bounded pagination fetch
//!
//! One sequential call learns the total, then the remaining pages are
//! requested concurrently under a fixed call budget and stitched back
//! together by offset.

use super::types::{FetchOutcome, OffsetPlan, SearchQuery, SearchService};
use crate::error::{Error, Result};
use futures::future::try_join_all;
use tracing::{debug, info, warn};

/// Default maximum number of upstream calls per fetch
pub const DEFAULT_MAX_CALLS: u32 = 5;

/// Assembles a result set larger than one page from an upstream service
#[derive(Debug, Clone)]
pub struct PaginatedFetcher<S> {
    service: S,
    max_calls: u32,
}

impl<S: SearchService> PaginatedFetcher<S> {
    /// Create a fetcher with the default call budget
    pub fn new(service: S) -> Self {
        Self {
            service,
            max_calls: DEFAULT_MAX_CALLS,
        }
    }

    /// Set the call budget
    #[must_use]
    pub fn with_max_calls(mut self, max_calls: u32) -> Self {
        self.max_calls = max_calls;
        self
    }

    /// Get the call budget
    pub fn max_calls(&self) -> u32 {
        self.max_calls
    }

    /// Get the upstream service
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Fetch every page of `query` the call budget allows.
    ///
    /// Any failed page fails the whole fetch. Dropping the returned future
    /// drops every in-flight page request with it.
    pub async fn fetch(&self, query: &SearchQuery) -> Result<FetchOutcome<S::Item>> {
        query.validate()?;
        if self.max_calls == 0 {
            return Err(Error::config("max_calls must be at least 1"));
        }

        let first = self.service.search(query, 0).await?;
        if first.items.len() > query.page_limit as usize {
            warn!(
                returned = first.items.len(),
                page_limit = query.page_limit,
                "Upstream returned more items than the page limit"
            );
        }

        let plan = OffsetPlan::new(
            first.items.len(),
            first.total_available,
            query.page_limit,
            self.max_calls,
        );
        debug!(
            first_page = first.items.len(),
            total = first.total_available,
            pages_needed = plan.pages_needed,
            offsets = ?plan.offsets,
            "Planned follow-up pages"
        );

        let mut items = first.items;

        if !plan.offsets.is_empty() {
            // try_join_all keeps input order, so pages line up by offset
            // whatever order they complete in.
            let pages = try_join_all(
                plan.offsets
                    .iter()
                    .map(|&offset| self.service.search(query, offset)),
            )
            .await?;

            for (offset, page) in plan.offsets.iter().zip(pages) {
                debug!(offset, count = page.items.len(), "Page received");
                items.extend(page.items);
            }
        }

        if plan.is_truncated() {
            warn!(
                total = first.total_available,
                fetched = items.len(),
                skipped_pages = plan.pages_skipped(),
                max_calls = self.max_calls,
                "Call budget exhausted, result set is partial"
            );
        }

        let calls_made = 1 + plan.offsets.len() as u32;
        info!(
            term = %query.term,
            count = items.len(),
            total = first.total_available,
            calls = calls_made,
            "Fetch complete"
        );

        Ok(FetchOutcome {
            items,
            total_available: first.total_available,
            calls_made,
            pages_skipped: plan.pages_skipped(),
        })
    }
}
