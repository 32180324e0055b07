//! Pagination module
//!
//! Bounded offset pagination over an upstream search service.
//!
//! # Overview
//!
//! A fetch issues one request at offset 0, reads the reported total, then
//! requests the remaining pages concurrently, capped by a per-fetch call
//! budget. Pages are concatenated by ascending offset, never by arrival
//! order. When the budget is too small the outcome is partial; see
//! [`FetchOutcome::is_complete`].

mod fetcher;
mod types;

pub use fetcher::{PaginatedFetcher, DEFAULT_MAX_CALLS};
pub use types::{FetchOutcome, OffsetPlan, Page, SearchQuery, SearchService};

#[cfg(test)]
mod tests;
