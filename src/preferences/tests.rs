//! Tests for preferences module

use super::*;
use crate::error::Error;
use chrono::{DateTime, Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap()
}

fn window() -> Duration {
    default_too_soon_window()
}

fn list(ids: &[&'static str]) -> SuggestionList<&'static str> {
    SuggestionList::new(ids.to_vec(), PreferenceBook::new(), now(), window())
}

// ============================================================================
// PreferenceRecord Tests
// ============================================================================

#[test]
fn test_like_toggles_and_clears_dont_like() {
    let mut record = PreferenceRecord::default();

    record.apply(Signal::DontLike, now());
    assert!(record.dont_like_at.is_some());

    record.apply(Signal::Like, now());
    assert!(record.liked);
    assert_eq!(record.dont_like_at, None);

    record.apply(Signal::Like, now());
    assert!(!record.liked);
    assert!(record.is_empty());
}

#[test]
fn test_dont_like_toggles_and_clears_like() {
    let mut record = PreferenceRecord::default();

    record.apply(Signal::Like, now());
    record.apply(Signal::DontLike, now());
    assert!(!record.liked);
    assert_eq!(record.dont_like_at, Some(now()));

    record.apply(Signal::DontLike, now());
    assert_eq!(record.dont_like_at, None);
}

#[test]
fn test_too_soon_and_dismiss() {
    let mut record = PreferenceRecord::default();
    record.apply(Signal::TooSoon, now());
    record.apply(Signal::Dismiss, now());
    record.apply(Signal::Dismiss, now());

    assert_eq!(record.too_soon_at, Some(now()));
    assert_eq!(record.dismissed_count, 2);
}

#[test]
fn test_verdict_too_soon_expires() {
    let mut record = PreferenceRecord::default();
    record.apply(Signal::Like, now());
    record.apply(Signal::TooSoon, now());

    assert_eq!(
        record.verdict(now() + Duration::days(1), window()),
        Verdict::TooSoon { since: now() }
    );
    assert_eq!(
        record.verdict(now() + Duration::days(3), window()),
        Verdict::Liked
    );
}

#[test]
fn test_verdict_describe() {
    let later = now() + Duration::days(2);
    assert_eq!(
        Verdict::TooSoon { since: now() }.describe(later),
        Some("You ate here 2 days ago".to_string())
    );
    assert_eq!(
        Verdict::TooSoon { since: now() }.describe(now() + Duration::hours(5)),
        Some("You ate here 5 hours ago".to_string())
    );
    assert_eq!(
        Verdict::DontLike { since: now() }.describe(now() + Duration::days(1)),
        Some("You didn't like this place yesterday".to_string())
    );
    assert_eq!(Verdict::Neutral.describe(later), None);
    assert!(Verdict::Liked.describe(later).is_some());
}

// ============================================================================
// PreferenceBook Tests
// ============================================================================

#[test]
fn test_book_rank_groups_and_keeps_upstream_order() {
    let mut book = PreferenceBook::new();
    book.record("d", Signal::Like, now());
    book.record("a", Signal::DontLike, now());
    book.record("b", Signal::TooSoon, now());
    book.record("f", Signal::Like, now());

    let ranked = book.rank(vec!["a", "b", "c", "d", "e", "f"], now(), window());
    let order: Vec<_> = ranked.iter().map(|r| r.item).collect();

    assert_eq!(order, vec!["d", "f", "c", "e", "b", "a"]);
    assert_eq!(ranked[0].verdict, Verdict::Liked);
    assert_eq!(ranked[2].note, None);
    assert_eq!(ranked[4].note, Some("You ate here just now".to_string()));
}

#[test]
fn test_book_prune_and_serde() {
    let mut book = PreferenceBook::new();
    book.record("a", Signal::Like, now());
    book.record("a", Signal::Like, now());
    book.record("b", Signal::Dismiss, now());
    assert_eq!(book.len(), 2);

    book.prune();
    assert_eq!(book.len(), 1);
    assert_eq!(book.get("b").map(|r| r.dismissed_count), Some(1));

    let json = serde_json::to_string(&book).unwrap();
    let restored: PreferenceBook = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, book);
}

#[test]
fn test_book_deserializes_sparse_records() {
    let book: PreferenceBook =
        serde_json::from_str(r#"{"records": {"x": {"liked": true}}}"#).unwrap();
    assert_eq!(book.verdict("x", now(), window()), Verdict::Liked);
    assert_eq!(book.verdict("y", now(), window()), Verdict::Neutral);
}

// ============================================================================
// SuggestionList Tests
// ============================================================================

#[test]
fn test_list_ranks_on_creation() {
    let mut book = PreferenceBook::new();
    book.record("c", Signal::Like, now());

    let list = SuggestionList::new(vec!["a", "b", "c"], book, now(), window());
    assert_eq!(list.items(), &["c", "a", "b"]);
}

#[test]
fn test_list_like_moves_to_top_and_unlike_stays() {
    let mut list = list(&["a", "b", "c"]);

    assert_eq!(list.like(2, now()).unwrap(), 0);
    assert_eq!(list.items(), &["c", "a", "b"]);

    assert_eq!(list.like(0, now()).unwrap(), 0);
    assert_eq!(list.items(), &["c", "a", "b"]);
    assert!(!list.book().get("c").unwrap().liked);
}

#[test]
fn test_list_dont_like_moves_to_bottom() {
    let mut list = list(&["a", "b", "c"]);

    assert_eq!(list.dont_like(0, now()).unwrap(), 2);
    assert_eq!(list.items(), &["b", "c", "a"]);

    // Second tap clears it in place.
    assert_eq!(list.dont_like(2, now()).unwrap(), 2);
    assert_eq!(list.book().get("a").unwrap().dont_like_at, None);
}

#[test]
fn test_list_too_soon_moves_to_bottom() {
    let mut list = list(&["a", "b", "c"]);

    assert_eq!(list.too_soon(1, now()).unwrap(), 2);
    assert_eq!(list.items(), &["a", "c", "b"]);

    let notes: Vec<_> = list
        .annotated(now() + Duration::days(1))
        .into_iter()
        .map(|r| r.note)
        .collect();
    assert_eq!(
        notes,
        vec![None, None, Some("You ate here yesterday".to_string())]
    );
}

#[test]
fn test_list_dismiss_and_undo() {
    let mut list = list(&["a", "b", "c"]);

    let dismissal = list.dismiss(1, now()).unwrap();
    assert_eq!(dismissal.position(), 1);
    assert_eq!(*dismissal.item(), "b");
    assert_eq!(list.items(), &["a", "c"]);

    assert_eq!(list.undo(dismissal), 1);
    assert_eq!(list.items(), &["a", "b", "c"]);
    assert_eq!(list.book().get("b").unwrap().dismissed_count, 1);
}

#[test]
fn test_list_undo_clamps_position() {
    let mut list = list(&["a", "b", "c"]);

    let dismissal = list.dismiss(2, now()).unwrap();
    let _kept_out = list.dismiss(1, now()).unwrap();

    assert_eq!(list.undo(dismissal), 1);
    assert_eq!(list.items(), &["a", "c"]);
}

#[test]
fn test_list_rejects_bad_position() {
    let mut list = list(&["a"]);

    let err = list.like(3, now()).unwrap_err();
    assert!(matches!(err, Error::InvalidPosition { position: 3, len: 1 }));
    assert!(list.book().is_empty());
}

#[test]
fn test_list_rejects_listing_without_id() {
    let listing = crate::upstream::Listing::new(serde_json::Map::new());
    let mut list = SuggestionList::new(vec![listing], PreferenceBook::new(), now(), window());

    let err = list.too_soon(0, now()).unwrap_err();
    assert!(matches!(err, Error::UnknownListing { .. }));
}

#[test]
fn test_list_into_book_carries_signals() {
    let mut list = list(&["a", "b"]);
    list.like(1, now()).unwrap();

    let book = list.into_book();
    let next = SuggestionList::new(vec!["a", "b"], book, now(), window());
    assert_eq!(next.items(), &["b", "a"]);
}
