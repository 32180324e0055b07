//! Listing record returned by the business search endpoint
//!
//! A listing is kept as the raw JSON object so every attribute upstream
//! sends flows through unchanged. Accessors are read-only conveniences.

use crate::types::{JsonObject, JsonValue};
use serde::{Deserialize, Serialize};

/// One business listing, as returned by upstream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Listing(JsonObject);

impl Listing {
    /// Wrap a raw JSON object
    pub fn new(fields: JsonObject) -> Self {
        Self(fields)
    }

    /// Upstream business id
    pub fn id(&self) -> Option<&str> {
        self.str_field("id")
    }

    /// Display name
    pub fn name(&self) -> Option<&str> {
        self.str_field("name")
    }

    /// Business page URL
    pub fn url(&self) -> Option<&str> {
        self.str_field("url")
    }

    /// Image URL, if upstream has one
    pub fn image_url(&self) -> Option<&str> {
        self.str_field("image_url").filter(|s| !s.is_empty())
    }

    /// Star rating (1.0 to 5.0 in half steps)
    pub fn rating(&self) -> Option<f64> {
        self.0.get("rating").and_then(JsonValue::as_f64)
    }

    /// Number of reviews
    pub fn review_count(&self) -> Option<u64> {
        self.0.get("review_count").and_then(JsonValue::as_u64)
    }

    /// Category titles joined with ", "
    pub fn categories(&self) -> Option<String> {
        let titles: Vec<&str> = self
            .0
            .get("categories")?
            .as_array()?
            .iter()
            .filter_map(|c| c.get("title").and_then(JsonValue::as_str))
            .collect();
        if titles.is_empty() {
            None
        } else {
            Some(titles.join(", "))
        }
    }

    /// "street, city" from the location block
    pub fn address(&self) -> Option<String> {
        let location = self.0.get("location")?;
        let street = location.get("address1").and_then(JsonValue::as_str);
        let city = location.get("city").and_then(JsonValue::as_str);
        match (street, city) {
            (Some(s), Some(c)) if !s.is_empty() => Some(format!("{s}, {c}")),
            (_, Some(c)) => Some(c.to_string()),
            (Some(s), None) => Some(s.to_string()),
            (None, None) => None,
        }
    }

    /// Raw field access
    pub fn get(&self, field: &str) -> Option<&JsonValue> {
        self.0.get(field)
    }

    /// Raw JSON fields
    pub fn fields(&self) -> &JsonObject {
        &self.0
    }

    fn str_field(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(JsonValue::as_str)
    }
}

impl TryFrom<JsonValue> for Listing {
    type Error = JsonValue;

    fn try_from(value: JsonValue) -> std::result::Result<Self, Self::Error> {
        match value {
            JsonValue::Object(map) => Ok(Self(map)),
            other => Err(other),
        }
    }
}
