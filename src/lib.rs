// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Lunchlist
//!
//! Nearby restaurant suggestions from a business search API, assembled with
//! a bounded, concurrent pagination fetch and reordered by personal
//! preference signals.
//!
//! ## Features
//!
//! - **Bounded Pagination**: one call learns the total, the rest of the pages
//!   are fetched concurrently under a fixed call budget
//! - **Ordered Results**: pages are stitched by offset, never by arrival
//! - **Preference Signals**: like, don't-like, too-soon and dismiss with undo
//! - **Group Polls**: up and down votes on a shared ballot, ordered by score
//! - **Location Flow**: acquisition steps as an explicit state machine
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use lunchlist::{AppConfig, BusinessSearchService, HttpClient, PaginatedFetcher, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = AppConfig::load(None)?;
//!     let client = HttpClient::with_config(config.http_client_config()?)?;
//!     let fetcher = PaginatedFetcher::new(BusinessSearchService::new(client))
//!         .with_max_calls(config.search.max_calls);
//!
//!     let outcome = fetcher.fetch(&config.query_at("40.7128", "-74.0060")).await?;
//!     println!("{} of {}", outcome.len(), outcome.total_available);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                  PaginatedFetcher::fetch                  │
//! │   offset 0 → OffsetPlan → try_join_all(offsets) → concat  │
//! └───────────────────────────────────────────────────────────┘
//!                             │ SearchService
//! ┌──────────────┬────────────┴──────────┬────────────────────┐
//! │  HttpClient  │ BusinessSearchService │    Preferences     │
//! ├──────────────┼───────────────────────┼────────────────────┤
//! │ Bearer auth  │ /businesses/search    │ PreferenceBook     │
//! │ Timeout      │ Listing decoding      │ SuggestionList     │
//! │ Retry (opt.) │                       │                    │
//! └──────────────┴───────────────────────┴────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
#[allow(missing_docs)]
pub mod error;

/// Common types and type aliases
pub mod types;

/// HTTP client with optional retry
pub mod http;

/// Bounded pagination fetch
pub mod pagination;

/// Business search adapter
pub mod upstream;

/// Preference signals and suggestion ordering
pub mod preferences;

/// Group lunch polls
pub mod poll;

/// Location acquisition state machine
pub mod location;

/// Application configuration
pub mod config;

/// Command-line interface
#[allow(missing_docs)]
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use config::AppConfig;
pub use http::{HttpClient, HttpClientConfig};
pub use location::{Coordinates, LocationEvent, LocationFlow, LocationState};
pub use pagination::{FetchOutcome, Page, PaginatedFetcher, SearchQuery, SearchService};
pub use poll::{Poll, VotableRestaurant, VoteType};
pub use preferences::{PreferenceBook, Signal, SuggestionList, Verdict};
pub use upstream::{BusinessSearchService, Listing};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
