//! The reading-statistics aggregator.
//!
//! [`summarize`] reduces one user's snapshot (books, all their sessions,
//! wishlist) into the three summary records served by `GET /api/user/stats`.
//! It is a pure function of the snapshot and the injected evaluation
//! instant: no hidden state, no wall-clock reads, so callers (and tests)
//! control time explicitly.
//!
//! Tie-breaks (`busiestReadingMonth`, `mostWishedAuthor`) go to the first
//! maximum encountered in snapshot order. The counting maps are only an
//! intermediate; argmax scans the snapshot sequence itself, so the result
//! never depends on hash-map iteration order.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  book::{Book, BookStatus},
  session::ReadingSession,
  wishlist::WishlistEntry,
};

// ─── Summary records ─────────────────────────────────────────────────────────

/// Aggregates over the book collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookStats {
  pub total_books:            u32,
  pub completed_books:        u32,
  pub currently_reading:      u32,
  pub abandoned_books:        u32,
  pub not_started_books:      u32,
  pub total_pages:            u32,
  pub average_pages_per_book: u32,
  pub genre_distribution:     BTreeMap<String, u32>,
  pub author_stats:           BTreeMap<String, u32>,
  /// Completed books as a whole percentage of the shelf.
  pub completion_rate:        u32,
}

/// Aggregates over every logged session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingStats {
  pub total_sessions:            u32,
  /// Minutes.
  pub total_reading_time:        u32,
  pub average_session_length:    u32,
  pub average_sessions_per_book: u32,
  pub pages_read_in_sessions:    u32,
  /// Pages per minute, rounded to two decimals.
  pub average_reading_speed:     f64,
  pub reading_streak:            u32,
  /// Long month name and year, e.g. "March 2024"; empty when no sessions.
  pub busiest_reading_month:     String,
  pub sessions_this_month:       u32,
  pub sessions_this_year:        u32,
}

/// Aggregates over the wishlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistStats {
  pub total_wishlist_books: u32,
  /// Mean age of the entries in whole days.
  pub average_wishlist_age: i64,
  pub most_wished_genre:    String,
  pub most_wished_author:   String,
}

/// The combined payload of the statistics endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
  pub book_stats:     BookStats,
  pub reading_stats:  ReadingStats,
  pub wishlist_stats: WishlistStats,
}

// ─── Aggregation ─────────────────────────────────────────────────────────────

/// Reduce one user's snapshot into the combined summary.
pub fn summarize(
  books: &[Book],
  sessions: &[ReadingSession],
  wishlist: &[WishlistEntry],
  now: DateTime<Utc>,
) -> StatsSummary {
  StatsSummary {
    book_stats:     book_stats(books),
    reading_stats:  reading_stats(sessions, now),
    wishlist_stats: wishlist_stats(wishlist, now),
  }
}

/// `round(num / den)`, with 0 for an empty denominator.
fn round_ratio(num: u64, den: u64) -> u32 {
  if den == 0 {
    0
  } else {
    (num as f64 / den as f64).round() as u32
  }
}

fn book_stats(books: &[Book]) -> BookStats {
  let mut by_status = [0u32; 4];
  let mut genre_distribution: BTreeMap<String, u32> = BTreeMap::new();
  let mut author_stats: BTreeMap<String, u32> = BTreeMap::new();
  let mut total_pages: u64 = 0;

  for book in books {
    // Exact-match buckets; an unrecognized status lands in none of them.
    match book.status {
      BookStatus::Completed => by_status[0] += 1,
      BookStatus::Reading => by_status[1] += 1,
      BookStatus::Abandoned => by_status[2] += 1,
      BookStatus::NotStarted => by_status[3] += 1,
      BookStatus::Other(_) => {}
    }

    total_pages += u64::from(book.total_pages.unwrap_or(0));

    let genre = book.genre.clone().unwrap_or_else(|| "Unknown".to_owned());
    *genre_distribution.entry(genre).or_insert(0) += 1;

    // A book with N authors bumps N counters by one each.
    for author in &book.authors {
      *author_stats.entry(author.clone()).or_insert(0) += 1;
    }
  }

  let total_books = books.len() as u32;
  BookStats {
    total_books,
    completed_books: by_status[0],
    currently_reading: by_status[1],
    abandoned_books: by_status[2],
    not_started_books: by_status[3],
    total_pages: total_pages as u32,
    average_pages_per_book: round_ratio(total_pages, u64::from(total_books)),
    genre_distribution,
    author_stats,
    completion_rate: round_ratio(u64::from(by_status[0]) * 100, u64::from(total_books)),
  }
}

fn reading_stats(sessions: &[ReadingSession], now: DateTime<Utc>) -> ReadingStats {
  let total_sessions = sessions.len() as u32;
  let total_reading_time: u32 = sessions.iter().map(|s| s.duration_minutes).sum();
  let pages_read_in_sessions: u32 = sessions.iter().map(|s| s.pages_read.unwrap_or(0)).sum();

  let books_with_sessions = sessions
    .iter()
    .map(|s| s.book_id.as_str())
    .collect::<HashSet<_>>()
    .len() as u64;

  // Reading speed counts only sessions that actually recorded pages;
  // zero-page sessions are excluded from numerator and denominator both.
  let (speed_pages, speed_minutes) = sessions
    .iter()
    .filter(|s| s.pages_read.unwrap_or(0) > 0)
    .fold((0u64, 0u64), |(p, m), s| {
      (
        p + u64::from(s.pages_read.unwrap_or(0)),
        m + u64::from(s.duration_minutes),
      )
    });
  let average_reading_speed = if speed_minutes == 0 {
    0.0
  } else {
    (speed_pages as f64 / speed_minutes as f64 * 100.0).round() / 100.0
  };

  let dates: Vec<DateTime<Utc>> = sessions.iter().map(|s| s.session_date.resolve(now)).collect();

  let sessions_this_month = dates
    .iter()
    .filter(|d| d.year() == now.year() && d.month() == now.month())
    .count() as u32;
  let sessions_this_year = dates.iter().filter(|d| d.year() == now.year()).count() as u32;

  ReadingStats {
    total_sessions,
    total_reading_time,
    average_session_length: round_ratio(u64::from(total_reading_time), u64::from(total_sessions)),
    average_sessions_per_book: round_ratio(u64::from(total_sessions), books_with_sessions),
    pages_read_in_sessions,
    average_reading_speed,
    // TODO: compute a real consecutive-day streak once per-day reading
    // activity is tracked; until then the field is a fixed placeholder.
    reading_streak: 0,
    busiest_reading_month: busiest_month(&dates),
    sessions_this_month,
    sessions_this_year,
  }
}

/// The (year, month) bucket with the most sessions, formatted as a long
/// month name and year. First maximum in snapshot order wins ties.
fn busiest_month(dates: &[DateTime<Utc>]) -> String {
  let mut counts: HashMap<(i32, u32), u32> = HashMap::new();
  for d in dates {
    *counts.entry((d.year(), d.month())).or_insert(0) += 1;
  }

  let mut seen = HashSet::new();
  let mut best: Option<((i32, u32), u32)> = None;
  for d in dates {
    let key = (d.year(), d.month());
    if !seen.insert(key) {
      continue;
    }
    let count = counts[&key];
    if best.is_none_or(|(_, c)| count > c) {
      best = Some((key, count));
    }
  }

  best
    .and_then(|((year, month), _)| NaiveDate::from_ymd_opt(year, month, 1))
    .map(|d| d.format("%B %Y").to_string())
    .unwrap_or_default()
}

fn wishlist_stats(wishlist: &[WishlistEntry], now: DateTime<Utc>) -> WishlistStats {
  let total_wishlist_books = wishlist.len() as u32;

  let average_wishlist_age = if wishlist.is_empty() {
    0
  } else {
    let total_ms: i64 = wishlist
      .iter()
      .map(|w| (now - w.added_at.resolve(now)).num_milliseconds())
      .sum();
    (total_ms as f64 / (wishlist.len() as f64 * 86_400_000.0)).round() as i64
  };

  let mut counts: HashMap<&str, u32> = HashMap::new();
  for entry in wishlist {
    for author in &entry.authors {
      *counts.entry(author.as_str()).or_insert(0) += 1;
    }
  }

  let mut seen = HashSet::new();
  let mut best: Option<(&str, u32)> = None;
  for entry in wishlist {
    for author in &entry.authors {
      if !seen.insert(author.as_str()) {
        continue;
      }
      let count = counts[author.as_str()];
      if best.is_none_or(|(_, c)| count > c) {
        best = Some((author.as_str(), count));
      }
    }
  }

  WishlistStats {
    total_wishlist_books,
    average_wishlist_age,
    // Wishlist entries carry no genre data, so there is nothing to count.
    most_wished_genre: "Unknown".to_owned(),
    most_wished_author: best
      .map(|(author, _)| author.to_owned())
      .unwrap_or_else(|| "Unknown".to_owned()),
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;
  use uuid::Uuid;

  use crate::timestamp::Timestamp;

  fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
  }

  fn book(id: &str, status: BookStatus, total_pages: Option<u32>) -> Book {
    Book {
      id:           id.into(),
      title:        format!("Book {id}"),
      authors:      Vec::new(),
      cover_image:  None,
      genre:        None,
      status,
      total_pages,
      current_page: None,
      started_at:   None,
      completed_at: None,
      notes:        None,
    }
  }

  fn session(book_id: &str, minutes: u32, pages: Option<u32>, date: &str) -> ReadingSession {
    ReadingSession {
      id:               Uuid::new_v4(),
      book_id:          book_id.into(),
      duration_minutes: minutes,
      pages_read:       pages,
      session_date:     Timestamp::Iso(date.into()),
      notes:            None,
    }
  }

  fn entry(id: &str, authors: &[&str], added: &str) -> WishlistEntry {
    WishlistEntry {
      id:          id.into(),
      title:       format!("Wish {id}"),
      authors:     authors.iter().map(|a| (*a).to_owned()).collect(),
      cover_image: None,
      added_at:    Timestamp::Iso(added.into()),
    }
  }

  // ── Empty input ───────────────────────────────────────────────────────

  #[test]
  fn all_empty_input_yields_zeroes_without_panicking() {
    let summary = summarize(&[], &[], &[], now());

    assert_eq!(summary.book_stats.total_books, 0);
    assert_eq!(summary.book_stats.average_pages_per_book, 0);
    assert_eq!(summary.book_stats.completion_rate, 0);
    assert!(summary.book_stats.genre_distribution.is_empty());

    assert_eq!(summary.reading_stats.total_sessions, 0);
    assert_eq!(summary.reading_stats.average_session_length, 0);
    assert_eq!(summary.reading_stats.average_sessions_per_book, 0);
    assert_eq!(summary.reading_stats.average_reading_speed, 0.0);
    assert_eq!(summary.reading_stats.busiest_reading_month, "");

    assert_eq!(summary.wishlist_stats.total_wishlist_books, 0);
    assert_eq!(summary.wishlist_stats.average_wishlist_age, 0);
    assert_eq!(summary.wishlist_stats.most_wished_author, "Unknown");
    assert_eq!(summary.wishlist_stats.most_wished_genre, "Unknown");
  }

  // ── Book stats ────────────────────────────────────────────────────────

  #[test]
  fn status_buckets_partition_the_shelf() {
    let books = vec![
      book("a", BookStatus::Completed, None),
      book("b", BookStatus::Reading, None),
      book("c", BookStatus::Abandoned, None),
      book("d", BookStatus::NotStarted, None),
      book("e", BookStatus::Completed, None),
    ];
    let stats = book_stats(&books);
    assert_eq!(stats.total_books, 5);
    assert_eq!(stats.completed_books, 2);
    assert_eq!(stats.currently_reading, 1);
    assert_eq!(stats.abandoned_books, 1);
    assert_eq!(stats.not_started_books, 1);
    assert_eq!(
      stats.completed_books + stats.currently_reading + stats.abandoned_books + stats.not_started_books,
      stats.total_books
    );
    // round(2 / 5 * 100)
    assert_eq!(stats.completion_rate, 40);
  }

  #[test]
  fn unrecognized_status_counts_in_no_bucket() {
    let books = vec![
      book("a", BookStatus::Completed, None),
      book("b", BookStatus::Other("paused".into()), None),
    ];
    let stats = book_stats(&books);
    assert_eq!(stats.total_books, 2);
    assert_eq!(
      stats.completed_books + stats.currently_reading + stats.abandoned_books + stats.not_started_books,
      1
    );
  }

  #[test]
  fn page_totals_treat_missing_as_zero() {
    let books = vec![
      book("a", BookStatus::Reading, Some(100)),
      book("b", BookStatus::Reading, Some(200)),
      book("c", BookStatus::Reading, None),
    ];
    let stats = book_stats(&books);
    assert_eq!(stats.total_pages, 300);
    assert_eq!(stats.average_pages_per_book, 100);
  }

  #[test]
  fn missing_genre_buckets_under_unknown() {
    let mut with_genre = book("a", BookStatus::Reading, None);
    with_genre.genre = Some("Fantasy".into());
    let books = vec![with_genre, book("b", BookStatus::Reading, None), book("c", BookStatus::Reading, None)];
    let stats = book_stats(&books);
    assert_eq!(stats.genre_distribution["Fantasy"], 1);
    assert_eq!(stats.genre_distribution["Unknown"], 2);
  }

  #[test]
  fn each_coauthor_is_counted_once_per_book() {
    let mut first = book("a", BookStatus::Reading, None);
    first.authors = vec!["A".into(), "B".into()];
    let mut second = book("b", BookStatus::Reading, None);
    second.authors = vec!["A".into()];
    let stats = book_stats(&[first, second]);
    assert_eq!(stats.author_stats["A"], 2);
    assert_eq!(stats.author_stats["B"], 1);
  }

  // ── Reading stats ─────────────────────────────────────────────────────

  #[test]
  fn zero_page_sessions_are_excluded_from_reading_speed() {
    let sessions = vec![
      session("a", 30, Some(10), "2024-03-01T10:00:00Z"),
      session("a", 60, Some(0), "2024-03-02T10:00:00Z"),
    ];
    let stats = reading_stats(&sessions, now());
    assert_eq!(stats.total_reading_time, 90);
    assert_eq!(stats.pages_read_in_sessions, 10);
    // 10 pages over 30 minutes; the zero-page hour contributes nothing.
    assert_eq!(stats.average_reading_speed, 0.33);
  }

  #[test]
  fn reading_speed_rounds_to_two_decimals() {
    let sessions = vec![session("a", 3, Some(10), "2024-03-01T10:00:00Z")];
    let stats = reading_stats(&sessions, now());
    assert_eq!(stats.average_reading_speed, 3.33);
  }

  #[test]
  fn session_averages() {
    let sessions = vec![
      session("a", 30, None, "2024-03-01T10:00:00Z"),
      session("a", 40, None, "2024-03-02T10:00:00Z"),
      session("b", 20, None, "2024-03-03T10:00:00Z"),
    ];
    let stats = reading_stats(&sessions, now());
    assert_eq!(stats.total_sessions, 3);
    // round(90 / 3) and round(3 sessions / 2 books with sessions)
    assert_eq!(stats.average_session_length, 30);
    assert_eq!(stats.average_sessions_per_book, 2);
  }

  #[test]
  fn calendar_buckets_follow_the_injected_clock() {
    let sessions = vec![
      session("a", 30, None, "2024-03-01T10:00:00Z"),
      session("a", 30, None, "2024-02-10T10:00:00Z"),
      session("a", 30, None, "2023-03-15T10:00:00Z"),
    ];
    let stats = reading_stats(&sessions, now());
    assert_eq!(stats.sessions_this_month, 1);
    assert_eq!(stats.sessions_this_year, 2);
  }

  #[test]
  fn busiest_month_takes_the_highest_count() {
    let sessions = vec![
      session("a", 30, None, "2024-01-05T10:00:00Z"),
      session("a", 30, None, "2024-02-01T10:00:00Z"),
      session("a", 30, None, "2024-02-20T10:00:00Z"),
    ];
    let stats = reading_stats(&sessions, now());
    assert_eq!(stats.busiest_reading_month, "February 2024");
  }

  #[test]
  fn busiest_month_tie_goes_to_first_in_snapshot_order() {
    let sessions = vec![
      session("a", 30, None, "2024-01-05T10:00:00Z"),
      session("a", 30, None, "2024-02-01T10:00:00Z"),
    ];
    let stats = reading_stats(&sessions, now());
    assert_eq!(stats.busiest_reading_month, "January 2024");
  }

  #[test]
  fn unparseable_session_date_counts_as_now() {
    let sessions = vec![session("a", 30, None, "not a date")];
    let stats = reading_stats(&sessions, now());
    assert_eq!(stats.sessions_this_month, 1);
    assert_eq!(stats.sessions_this_year, 1);
    assert_eq!(stats.busiest_reading_month, "March 2024");
  }

  #[test]
  fn reading_streak_is_a_placeholder() {
    let sessions = vec![session("a", 30, None, "2024-03-14T10:00:00Z")];
    assert_eq!(reading_stats(&sessions, now()).reading_streak, 0);
  }

  // ── Wishlist stats ────────────────────────────────────────────────────

  #[test]
  fn wishlist_age_is_mean_days_since_added() {
    let wishlist = vec![entry("a", &[], "2024-03-05T12:00:00Z")];
    let stats = wishlist_stats(&wishlist, now());
    assert_eq!(stats.average_wishlist_age, 10);
  }

  #[test]
  fn wishlist_age_averages_across_entries() {
    let wishlist = vec![
      entry("a", &[], "2024-03-05T12:00:00Z"),
      entry("b", &[], "2024-03-11T12:00:00Z"),
    ];
    // (10 + 4) / 2
    assert_eq!(wishlist_stats(&wishlist, now()).average_wishlist_age, 7);
  }

  #[test]
  fn most_wished_author_counts_across_author_lists() {
    let wishlist = vec![
      entry("a", &["A", "B"], "2024-03-01T12:00:00Z"),
      entry("b", &["B"], "2024-03-02T12:00:00Z"),
    ];
    assert_eq!(wishlist_stats(&wishlist, now()).most_wished_author, "B");
  }

  #[test]
  fn most_wished_author_tie_goes_to_first_encountered() {
    let wishlist = vec![
      entry("a", &["A"], "2024-03-01T12:00:00Z"),
      entry("b", &["B"], "2024-03-02T12:00:00Z"),
    ];
    assert_eq!(wishlist_stats(&wishlist, now()).most_wished_author, "A");
  }

  #[test]
  fn entries_without_authors_report_unknown() {
    let wishlist = vec![entry("a", &[], "2024-03-01T12:00:00Z")];
    assert_eq!(wishlist_stats(&wishlist, now()).most_wished_author, "Unknown");
  }

  // ── Purity ────────────────────────────────────────────────────────────

  #[test]
  fn summarize_is_idempotent_under_a_frozen_clock() {
    let books = vec![book("a", BookStatus::Completed, Some(320))];
    let sessions = vec![session("a", 45, Some(30), "2024-03-01T10:00:00Z")];
    let wishlist = vec![entry("w", &["A"], "2024-02-01T12:00:00Z")];

    let first = summarize(&books, &sessions, &wishlist, now());
    let second = summarize(&books, &sessions, &wishlist, now());
    assert_eq!(first, second);
  }

  #[test]
  fn summary_serializes_with_the_wire_field_names() {
    let summary = summarize(&[], &[], &[], now());
    let json = serde_json::to_value(&summary).unwrap();
    assert!(json.get("bookStats").is_some());
    assert!(json.get("readingStats").is_some());
    assert!(json.get("wishlistStats").is_some());
    assert!(json["readingStats"].get("busiestReadingMonth").is_some());
    assert!(json["wishlistStats"].get("mostWishedAuthor").is_some());
  }
}
