//! `SearchService` over the `/businesses/search` endpoint

use super::listing::Listing;
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::pagination::{Page, SearchQuery, SearchService};
use crate::types::JsonValue;
use async_trait::async_trait;
use tracing::debug;

/// Path of the search endpoint, relative to the client's base URL
pub const SEARCH_PATH: &str = "/businesses/search";

/// Business search backed by an [`HttpClient`]
#[derive(Debug, Clone)]
pub struct BusinessSearchService {
    client: HttpClient,
    path: String,
}

impl BusinessSearchService {
    /// Create a service using the default search path
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            path: SEARCH_PATH.to_string(),
        }
    }

    /// Override the search path
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Build the request parameters for one page
    pub fn request_for(query: &SearchQuery, offset: u64) -> RequestConfig {
        let mut request = RequestConfig::new()
            .query("term", &query.term)
            .query("latitude", &query.latitude)
            .query("longitude", &query.longitude)
            .query("radius", query.radius_meters)
            .query("limit", query.page_limit);
        if offset > 0 {
            request = request.query("offset", offset);
        }
        request
    }
}

#[async_trait]
impl SearchService for BusinessSearchService {
    type Item = Listing;

    async fn search(&self, query: &SearchQuery, offset: u64) -> Result<Page<Listing>> {
        debug!(offset, limit = query.page_limit, "Requesting business page");
        let body: JsonValue = self
            .client
            .get_json_with_config(&self.path, Self::request_for(query, offset))
            .await?;
        parse_search_response(body)
    }
}

/// Decode `{ "businesses": [...], "total": N }`
pub fn parse_search_response(body: JsonValue) -> Result<Page<Listing>> {
    let JsonValue::Object(mut map) = body else {
        return Err(Error::decode("search response is not a JSON object"));
    };

    let total = map
        .get("total")
        .and_then(JsonValue::as_u64)
        .ok_or_else(|| Error::decode("search response has no non-negative 'total'"))?;

    let businesses = match map.remove("businesses") {
        Some(JsonValue::Array(items)) => items,
        Some(_) => return Err(Error::decode("'businesses' is not an array")),
        None => return Err(Error::decode("search response has no 'businesses'")),
    };

    let items = businesses
        .into_iter()
        .enumerate()
        .map(|(i, value)| {
            Listing::try_from(value)
                .map_err(|_| Error::decode(format!("business #{i} is not a JSON object")))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Page::new(items, total))
}
