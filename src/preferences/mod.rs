//! Preferences module
//!
//! Personal signals (like, don't-like, too-soon, dismiss) recorded per
//! listing id, and the suggestion list they reorder.
//!
//! # Ordering
//!
//! Liked listings come first, then listings with no signal, then listings
//! marked too-soon within the window, then disliked ones. Upstream order
//! is kept inside each group.

mod book;
mod list;
mod types;

pub use book::{default_too_soon_window, PreferenceBook};
pub use list::{Dismissal, SuggestionList};
pub use types::{Identified, PreferenceRecord, Ranked, Signal, Verdict};

#[cfg(test)]
mod tests;
