//! Upstream module
//!
//! Adapter for the business search API (Yelp Fusion v3 shape).
//!
//! Requests `GET /businesses/search?term&latitude&longitude&radius&limit&offset`
//! with a bearer API key and decodes `{ "businesses": [...], "total": N }`
//! into [`Page<Listing>`](crate::pagination::Page).

mod business_search;
mod listing;

pub use business_search::{parse_search_response, BusinessSearchService, SEARCH_PATH};
pub use listing::Listing;
