//! Suggestion list: the ordered cards a user acts on

use super::book::PreferenceBook;
use super::types::{Identified, PreferenceRecord, Ranked, Signal, Verdict};
use crate::error::{Error, Result};
use chrono::{DateTime, Duration, Utc};

/// A dismissed listing, kept so the dismissal can be undone
#[derive(Debug, Clone, PartialEq)]
#[must_use = "dropping a dismissal makes it permanent for this session"]
pub struct Dismissal<T> {
    position: usize,
    item: T,
}

impl<T> Dismissal<T> {
    /// Position the item was removed from
    pub fn position(&self) -> usize {
        self.position
    }

    /// The dismissed item
    pub fn item(&self) -> &T {
        &self.item
    }
}

/// Ordered listings plus the preference book that orders them
#[derive(Debug, Clone)]
pub struct SuggestionList<T> {
    items: Vec<T>,
    book: PreferenceBook,
    too_soon_window: Duration,
}

impl<T: Identified> SuggestionList<T> {
    /// Rank freshly fetched items against `book`
    pub fn new(items: Vec<T>, book: PreferenceBook, now: DateTime<Utc>, window: Duration) -> Self {
        let items = book
            .rank(items, now, window)
            .into_iter()
            .map(|r| r.item)
            .collect();
        Self {
            items,
            book,
            too_soon_window: window,
        }
    }

    /// Items in display order
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The preference book
    pub fn book(&self) -> &PreferenceBook {
        &self.book
    }

    /// Give the book back, e.g. to persist it
    pub fn into_book(self) -> PreferenceBook {
        self.book
    }

    /// Items with verdicts and card text, in display order
    pub fn annotated(&self, now: DateTime<Utc>) -> Vec<Ranked<&T>> {
        self.items
            .iter()
            .map(|item| {
                let verdict = item.listing_id().map_or(Verdict::Neutral, |id| {
                    self.book.verdict(id, now, self.too_soon_window)
                });
                Ranked {
                    item,
                    verdict,
                    note: verdict.describe(now),
                }
            })
            .collect()
    }

    /// Toggle like. A newly liked item moves to the top.
    ///
    /// Returns the item's new position.
    pub fn like(&mut self, position: usize, now: DateTime<Utc>) -> Result<usize> {
        let record = self.signal(position, Signal::Like, now)?;
        if record.liked {
            Ok(self.move_to(position, 0))
        } else {
            Ok(position)
        }
    }

    /// Toggle don't-like. A newly disliked item moves to the bottom.
    pub fn dont_like(&mut self, position: usize, now: DateTime<Utc>) -> Result<usize> {
        let record = self.signal(position, Signal::DontLike, now)?;
        if record.dont_like_at.is_some() {
            let last = self.items.len() - 1;
            Ok(self.move_to(position, last))
        } else {
            Ok(position)
        }
    }

    /// Stamp too-soon and move the item to the bottom
    pub fn too_soon(&mut self, position: usize, now: DateTime<Utc>) -> Result<usize> {
        self.signal(position, Signal::TooSoon, now)?;
        let last = self.items.len() - 1;
        Ok(self.move_to(position, last))
    }

    /// Remove the item for this session and count the dismissal
    pub fn dismiss(&mut self, position: usize, now: DateTime<Utc>) -> Result<Dismissal<T>> {
        self.signal(position, Signal::Dismiss, now)?;
        let item = self.items.remove(position);
        Ok(Dismissal { position, item })
    }

    /// Put a dismissed item back where it was.
    ///
    /// The dismissal count is kept.
    pub fn undo(&mut self, dismissal: Dismissal<T>) -> usize {
        let position = dismissal.position.min(self.items.len());
        self.items.insert(position, dismissal.item);
        position
    }

    fn signal(
        &mut self,
        position: usize,
        signal: Signal,
        now: DateTime<Utc>,
    ) -> Result<PreferenceRecord> {
        let len = self.items.len();
        let item = self
            .items
            .get(position)
            .ok_or(Error::InvalidPosition { position, len })?;
        let id = item.listing_id().ok_or_else(|| Error::UnknownListing {
            context: format!("cannot record {signal} at position {position}"),
        })?;
        let id = id.to_string();
        Ok(self.book.record(&id, signal, now).clone())
    }

    fn move_to(&mut self, from: usize, to: usize) -> usize {
        if from != to {
            let item = self.items.remove(from);
            self.items.insert(to, item);
        }
        to
    }
}
