//! Preference signal and record types

use crate::upstream::Listing;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A user action on one listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    /// Thumbs up; toggles
    Like,
    /// Thumbs down; toggles
    DontLike,
    /// Ate there recently
    TooSoon,
    /// Hide for this session
    Dismiss,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Signal::Like => "like",
            Signal::DontLike => "dont_like",
            Signal::TooSoon => "too_soon",
            Signal::Dismiss => "dismiss",
        };
        f.write_str(name)
    }
}

/// Everything recorded about one listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceRecord {
    /// Liked; never set together with `dont_like_at`
    #[serde(default)]
    pub liked: bool,
    /// When the user said they don't like it
    #[serde(default)]
    pub dont_like_at: Option<DateTime<Utc>>,
    /// When the user last said it was too soon
    #[serde(default)]
    pub too_soon_at: Option<DateTime<Utc>>,
    /// How many times it has been dismissed
    #[serde(default)]
    pub dismissed_count: u32,
}

impl PreferenceRecord {
    /// Apply a signal at `now`
    pub fn apply(&mut self, signal: Signal, now: DateTime<Utc>) {
        match signal {
            Signal::Like => {
                self.liked = !self.liked;
                if self.liked {
                    self.dont_like_at = None;
                }
            }
            Signal::DontLike => {
                if self.dont_like_at.is_some() {
                    self.dont_like_at = None;
                } else {
                    self.dont_like_at = Some(now);
                    self.liked = false;
                }
            }
            Signal::TooSoon => self.too_soon_at = Some(now),
            Signal::Dismiss => self.dismissed_count = self.dismissed_count.saturating_add(1),
        }
    }

    /// Classify the record at `now`
    pub fn verdict(&self, now: DateTime<Utc>, too_soon_window: Duration) -> Verdict {
        if let Some(since) = self.dont_like_at {
            return Verdict::DontLike { since };
        }
        if let Some(since) = self.too_soon_at {
            if now.signed_duration_since(since) < too_soon_window {
                return Verdict::TooSoon { since };
            }
        }
        if self.liked {
            Verdict::Liked
        } else {
            Verdict::Neutral
        }
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Where a listing belongs in the suggestion list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Liked, shown first
    Liked,
    /// No signal
    Neutral,
    /// Too-soon stamp still inside the window
    TooSoon {
        /// When it was stamped
        since: DateTime<Utc>,
    },
    /// Disliked, shown last
    DontLike {
        /// When it was disliked
        since: DateTime<Utc>,
    },
}

impl Verdict {
    /// Sort group; lower comes first
    pub fn rank(&self) -> u8 {
        match self {
            Verdict::Liked => 0,
            Verdict::Neutral => 1,
            Verdict::TooSoon { .. } => 2,
            Verdict::DontLike { .. } => 3,
        }
    }

    /// Short human text for a card, if the verdict says anything
    pub fn describe(&self, now: DateTime<Utc>) -> Option<String> {
        match self {
            Verdict::Liked => Some("You like this place!".to_string()),
            Verdict::Neutral => None,
            Verdict::TooSoon { since } => Some(format!("You ate here {}", ago(*since, now))),
            Verdict::DontLike { since } => {
                Some(format!("You didn't like this place {}", ago(*since, now)))
            }
        }
    }
}

fn ago(since: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(since);
    match elapsed.num_days() {
        d if d <= 0 => match elapsed.num_hours() {
            h if h <= 0 => "just now".to_string(),
            1 => "1 hour ago".to_string(),
            h => format!("{h} hours ago"),
        },
        1 => "yesterday".to_string(),
        d => format!("{d} days ago"),
    }
}

/// Anything that carries a stable upstream id
pub trait Identified {
    /// Stable id used as the preference key
    fn listing_id(&self) -> Option<&str>;
}

impl Identified for Listing {
    fn listing_id(&self) -> Option<&str> {
        self.id()
    }
}

impl Identified for String {
    fn listing_id(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl Identified for &str {
    fn listing_id(&self) -> Option<&str> {
        Some(*self)
    }
}

/// A listing with its verdict attached
#[derive(Debug, Clone, PartialEq)]
pub struct Ranked<T> {
    /// The listing
    pub item: T,
    /// Its verdict at ranking time
    pub verdict: Verdict,
    /// Card text, if any
    pub note: Option<String>,
}
