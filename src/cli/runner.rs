//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::pagination::{FetchOutcome, OffsetPlan, PaginatedFetcher};
use crate::preferences::{PreferenceBook, Ranked};
use crate::upstream::{BusinessSearchService, Listing};
use chrono::Utc;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::debug;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Search {
                lat,
                lon,
                term,
                radius,
                limit,
                max_calls,
                preferences,
            } => {
                let mut config = self.load_config()?;
                if let Some(term) = term {
                    config.search.term.clone_from(term);
                }
                if let Some(radius) = radius {
                    config.search.radius_meters = *radius;
                }
                if let Some(limit) = limit {
                    config.search.page_limit = *limit;
                }
                if let Some(max_calls) = max_calls {
                    config.search.max_calls = *max_calls;
                }
                config.validate()?;
                self.search(&config, lat, lon, preferences.as_deref()).await
            }
            Commands::Plan {
                total,
                first_page,
                limit,
                max_calls,
            } => {
                let config = self.load_config()?;
                self.plan(
                    *first_page,
                    *total,
                    limit.unwrap_or(config.search.page_limit),
                    max_calls.unwrap_or(config.search.max_calls),
                )
            }
            Commands::Config => self.show_config(),
        }
    }

    /// Load configuration file and environment
    fn load_config(&self) -> Result<AppConfig> {
        let config = AppConfig::load(self.cli.config.as_deref())?;
        debug!(base_url = %config.base_url, "Loaded configuration");
        Ok(config)
    }

    /// Fetch and print listings
    async fn search(
        &self,
        config: &AppConfig,
        lat: &str,
        lon: &str,
        preferences: Option<&Path>,
    ) -> Result<()> {
        let book = match preferences {
            Some(path) => load_preferences(path)?,
            None => PreferenceBook::new(),
        };

        let client = HttpClient::with_config(config.http_client_config()?)?;
        let fetcher = PaginatedFetcher::new(BusinessSearchService::new(client))
            .with_max_calls(config.search.max_calls);
        let query = config.query_at(lat, lon);

        let start = Instant::now();
        let outcome = fetcher.fetch(&query).await?;
        let duration_ms = start.elapsed().as_millis() as u64;

        let summary = summary_line(&outcome);
        let total_available = outcome.total_available;
        let calls_made = outcome.calls_made;
        let pages_skipped = outcome.pages_skipped;

        let now = Utc::now();
        let ranked = book.rank(outcome.into_items(), now, config.too_soon_window());

        match self.cli.format {
            OutputFormat::Json => {
                for entry in &ranked {
                    self.output_message(&json!({
                        "type": "LISTING",
                        "listing": entry.item,
                        "note": entry.note,
                    }));
                }
                self.output_message(&json!({
                    "type": "SUMMARY",
                    "summary": {
                        "count": ranked.len(),
                        "total_available": total_available,
                        "calls_made": calls_made,
                        "pages_skipped": pages_skipped,
                        "complete": pages_skipped == 0,
                        "duration_ms": duration_ms,
                    }
                }));
            }
            OutputFormat::Pretty => {
                for (i, entry) in ranked.iter().enumerate() {
                    println!("{}", pretty_entry(i + 1, entry));
                }
                println!("{summary}");
            }
        }

        Ok(())
    }

    /// Print an offset plan
    fn plan(&self, first_page: usize, total: u64, page_limit: u32, max_calls: u32) -> Result<()> {
        if page_limit == 0 {
            return Err(Error::invalid_query("page limit must be positive"));
        }
        if max_calls == 0 {
            return Err(Error::config("max_calls must be at least 1"));
        }

        let plan = OffsetPlan::new(first_page, total, page_limit, max_calls);
        match self.cli.format {
            OutputFormat::Json => self.output_message(&json!({
                "type": "PLAN",
                "plan": {
                    "offsets": plan.offsets,
                    "pages_needed": plan.pages_needed,
                    "pages_skipped": plan.pages_skipped(),
                    "calls": plan.offsets.len() + 1,
                }
            })),
            OutputFormat::Pretty => {
                println!("First call: offset 0 ({first_page} of {total})");
                for offset in &plan.offsets {
                    println!("Follow-up: offset {offset}");
                }
                if plan.is_truncated() {
                    println!(
                        "Budget of {max_calls} calls leaves {} of {} pages unrequested",
                        plan.pages_skipped(),
                        plan.pages_needed
                    );
                }
            }
        }
        Ok(())
    }

    /// Print effective configuration with secrets masked
    fn show_config(&self) -> Result<()> {
        let config = self.load_config()?;
        let redacted = config.redacted();
        match self.cli.format {
            OutputFormat::Json => self.output_message(&serde_json::to_value(&redacted)?),
            OutputFormat::Pretty => print!("{}", serde_yaml::to_string(&redacted)?),
        }
        Ok(())
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

/// Read a preference book from a JSON file
fn load_preferences(path: &Path) -> Result<PreferenceBook> {
    let content = fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Failed to read preferences file {}: {e}",
            path.display()
        ))
    })?;
    Ok(serde_json::from_str(&content)?)
}

fn pretty_entry(number: usize, entry: &Ranked<Listing>) -> String {
    let listing = &entry.item;
    let mut line = format!("{number}. {}", listing.name().unwrap_or("(unnamed)"));

    match (listing.rating(), listing.review_count()) {
        (Some(rating), Some(reviews)) => line.push_str(&format!(" [{rating} from {reviews} reviews]")),
        (Some(rating), None) => line.push_str(&format!(" [{rating}]")),
        _ => {}
    }
    if let Some(categories) = listing.categories() {
        line.push_str(&format!("\n   {categories}"));
    }
    if let Some(address) = listing.address() {
        line.push_str(&format!("\n   {address}"));
    }
    if let Some(note) = &entry.note {
        line.push_str(&format!("\n   {note}"));
    }
    line
}

fn summary_line<T>(outcome: &FetchOutcome<T>) -> String {
    let status = if outcome.is_complete() {
        "complete".to_string()
    } else {
        format!("truncated, {} pages not requested", outcome.pages_skipped)
    };
    format!(
        "{} of {} listings in {} calls ({status})",
        outcome.len(),
        outcome.total_available,
        outcome.calls_made
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::Verdict;
    use pretty_assertions::assert_eq;

    fn listing(value: Value) -> Listing {
        Listing::try_from(value).unwrap()
    }

    #[test]
    fn test_pretty_entry_full() {
        let entry = Ranked {
            item: listing(json!({
                "id": "x",
                "name": "Noodle Bar",
                "rating": 4.5,
                "review_count": 120,
                "categories": [{"title": "Ramen"}, {"title": "Bars"}],
                "location": {"address1": "1 Main St", "city": "Springfield"}
            })),
            verdict: Verdict::Liked,
            note: Some("You like this place!".to_string()),
        };

        assert_eq!(
            pretty_entry(1, &entry),
            "1. Noodle Bar [4.5 from 120 reviews]\n   Ramen, Bars\n   1 Main St, Springfield\n   You like this place!"
        );
    }

    #[test]
    fn test_pretty_entry_sparse() {
        let entry = Ranked {
            item: listing(json!({"id": "y"})),
            verdict: Verdict::Neutral,
            note: None,
        };
        assert_eq!(pretty_entry(3, &entry), "3. (unnamed)");
    }

    #[test]
    fn test_summary_line() {
        let outcome = FetchOutcome {
            items: vec![1, 2, 3],
            total_available: 9,
            calls_made: 1,
            pages_skipped: 2,
        };
        assert_eq!(
            summary_line(&outcome),
            "3 of 9 listings in 1 calls (truncated, 2 pages not requested)"
        );
    }

    #[test]
    fn test_load_preferences() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, r#"{"records": {"x": {"liked": true}}}"#).unwrap();

        let book = load_preferences(&path).unwrap();
        assert_eq!(book.len(), 1);

        let missing = load_preferences(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(missing, Error::Config { .. }));
    }
}
