//! Pagination types and traits
//!
//! Defines the query, page and outcome types shared by the fetcher and
//! every upstream adapter, plus the pure offset planner.

use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A nearby-search request: where, what, and how many per page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Search term (e.g. "lunch")
    pub term: String,
    /// Latitude as a decimal string; `validate` requires it within [-90, 90]
    pub latitude: String,
    /// Longitude as a decimal string; `validate` requires it within [-180, 180]
    pub longitude: String,
    /// Search radius in meters
    pub radius_meters: u32,
    /// Maximum results per page
    pub page_limit: u32,
}

impl SearchQuery {
    /// Create a query at the given coordinates
    pub fn new(
        term: impl Into<String>,
        latitude: impl Into<String>,
        longitude: impl Into<String>,
    ) -> Self {
        Self {
            term: term.into(),
            latitude: latitude.into(),
            longitude: longitude.into(),
            radius_meters: 1000,
            page_limit: 50,
        }
    }

    /// Set the search radius
    #[must_use]
    pub fn with_radius(mut self, radius_meters: u32) -> Self {
        self.radius_meters = radius_meters;
        self
    }

    /// Set the page size
    #[must_use]
    pub fn with_page_limit(mut self, page_limit: u32) -> Self {
        self.page_limit = page_limit;
        self
    }

    /// Reject queries that must never reach upstream
    pub fn validate(&self) -> Result<()> {
        if self.page_limit == 0 {
            return Err(Error::invalid_query("page limit must be positive"));
        }
        check_coordinate("latitude", &self.latitude, 90.0)?;
        check_coordinate("longitude", &self.longitude, 180.0)?;
        Ok(())
    }
}

fn check_coordinate(name: &str, value: &str, bound: f64) -> Result<()> {
    let parsed: f64 = value
        .trim()
        .parse()
        .map_err(|_| Error::invalid_query(format!("{name} '{value}' is not a decimal number")))?;
    if !parsed.is_finite() || parsed.abs() > bound {
        return Err(Error::invalid_query(format!(
            "{name} {value} is outside [-{bound}, {bound}]"
        )));
    }
    Ok(())
}

/// One batch of results from a single upstream call
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items in upstream order
    pub items: Vec<T>,
    /// Total number of results upstream says exist for the query
    pub total_available: u64,
}

impl<T> Page<T> {
    /// Create a page
    pub fn new(items: Vec<T>, total_available: u64) -> Self {
        Self {
            items,
            total_available,
        }
    }
}

/// Ordered, possibly truncated result of one fetch
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome<T> {
    /// All items, first page first, then later pages by ascending offset
    pub items: Vec<T>,
    /// Total reported by the first page
    pub total_available: u64,
    /// Number of upstream calls issued
    pub calls_made: u32,
    /// Pages that exist upstream but were not requested because of the call budget
    pub pages_skipped: u64,
}

impl<T> FetchOutcome<T> {
    /// Whether the call budget covered every page the first response announced
    pub fn is_complete(&self) -> bool {
        self.pages_skipped == 0
    }

    /// Number of items fetched
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing was fetched
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Hand the items over to the caller
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

/// Offsets a fetch will request after the first page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetPlan {
    /// Offsets to request, ascending
    pub offsets: Vec<u64>,
    /// Pages needed to cover everything upstream reported
    pub pages_needed: u64,
}

impl OffsetPlan {
    /// Plan follow-up offsets from the first page's size and reported total.
    ///
    /// At most `max_calls - 1` offsets are planned since the first call
    /// already used one unit of the budget.
    pub fn new(first_page_len: usize, total_available: u64, page_limit: u32, max_calls: u32) -> Self {
        let fetched = first_page_len as u64;
        if page_limit == 0 || fetched >= total_available {
            return Self {
                offsets: Vec::new(),
                pages_needed: 0,
            };
        }

        let limit = u64::from(page_limit);
        let pages_needed = (total_available - fetched).div_ceil(limit);
        let allowed = u64::from(max_calls.saturating_sub(1));

        let offsets = (1..=pages_needed.min(allowed)).map(|i| i * limit).collect();

        Self {
            offsets,
            pages_needed,
        }
    }

    /// Pages left out because the budget ran out
    pub fn pages_skipped(&self) -> u64 {
        self.pages_needed - self.offsets.len() as u64
    }

    /// Whether the plan is truncated by the budget
    pub fn is_truncated(&self) -> bool {
        self.pages_skipped() > 0
    }
}

/// Upstream search collaborator: one page per call
#[async_trait]
pub trait SearchService: Send + Sync {
    /// Listing type returned by upstream
    type Item: Send;

    /// Fetch the page starting at `offset`, using `query.page_limit` as its size
    async fn search(&self, query: &SearchQuery, offset: u64) -> Result<Page<Self::Item>>;
}

#[async_trait]
impl<S> SearchService for Arc<S>
where
    S: SearchService + ?Sized,
{
    type Item = S::Item;

    async fn search(&self, query: &SearchQuery, offset: u64) -> Result<Page<Self::Item>> {
        (**self).search(query, offset).await
    }
}
