//! Preference book: records keyed by listing id

use super::types::{Identified, PreferenceRecord, Ranked, Signal, Verdict};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Default time a too-soon stamp keeps a listing demoted
pub fn default_too_soon_window() -> Duration {
    Duration::days(3)
}

/// All preference records for one user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreferenceBook {
    #[serde(default)]
    records: HashMap<String, PreferenceRecord>,
}

impl PreferenceBook {
    /// Create an empty book
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a signal for `id` and return the updated record
    pub fn record(&mut self, id: &str, signal: Signal, now: DateTime<Utc>) -> &PreferenceRecord {
        let record = self.records.entry(id.to_string()).or_default();
        record.apply(signal, now);
        debug!(id, %signal, ?record, "Recorded preference");
        record
    }

    /// Record for `id`, if any
    pub fn get(&self, id: &str) -> Option<&PreferenceRecord> {
        self.records.get(id)
    }

    /// Verdict for `id` at `now`
    pub fn verdict(&self, id: &str, now: DateTime<Utc>, window: Duration) -> Verdict {
        self.get(id)
            .map_or(Verdict::Neutral, |r| r.verdict(now, window))
    }

    /// Number of listings with a record
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no listing has a record
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drop records that no longer hold any signal
    pub fn prune(&mut self) {
        self.records.retain(|_, r| !r.is_empty());
    }

    /// Reorder `items` into liked, neutral, too-soon, disliked.
    ///
    /// The sort is stable, so upstream order holds inside each group.
    /// Items without an id rank as neutral.
    pub fn rank<T: Identified>(
        &self,
        items: Vec<T>,
        now: DateTime<Utc>,
        window: Duration,
    ) -> Vec<Ranked<T>> {
        let mut ranked: Vec<Ranked<T>> = items
            .into_iter()
            .map(|item| {
                let verdict = item
                    .listing_id()
                    .map_or(Verdict::Neutral, |id| self.verdict(id, now, window));
                Ranked {
                    note: verdict.describe(now),
                    item,
                    verdict,
                }
            })
            .collect();
        ranked.sort_by_key(|r| r.verdict.rank());
        ranked
    }
}
