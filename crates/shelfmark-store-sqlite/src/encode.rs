//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are resolved to UTC at write time and stored as RFC 3339
//! strings; reads surface them as the string variant of the timestamp union.
//! Author lists are stored as compact JSON arrays.

use chrono::{DateTime, Utc};
use shelfmark_core::{
  Timestamp,
  book::{Book, BookStatus},
  session::ReadingSession,
  wishlist::WishlistEntry,
};
use uuid::Uuid;

use crate::Result;

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

/// Resolve any accepted wire shape to the stored RFC 3339 form.
pub fn encode_ts(ts: &Timestamp, fallback: DateTime<Utc>) -> String {
  encode_dt(ts.resolve(fallback))
}

pub fn encode_ts_opt(ts: Option<&Timestamp>, fallback: DateTime<Utc>) -> Option<String> {
  ts.map(|t| encode_ts(t, fallback))
}

// ─── Authors ─────────────────────────────────────────────────────────────────

pub fn encode_authors(authors: &[String]) -> Result<String> {
  Ok(serde_json::to_string(authors)?)
}

pub fn decode_authors(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Status ──────────────────────────────────────────────────────────────────

pub fn encode_status(status: &BookStatus) -> String { status.as_str().to_owned() }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `books` row.
pub struct RawBook {
  pub book_id:      String,
  pub title:        String,
  pub authors:      String,
  pub cover_image:  Option<String>,
  pub genre:        Option<String>,
  pub status:       String,
  pub total_pages:  Option<i64>,
  pub current_page: Option<i64>,
  pub started_at:   Option<String>,
  pub completed_at: Option<String>,
  pub notes:        Option<String>,
}

impl RawBook {
  pub fn into_book(self) -> Result<Book> {
    Ok(Book {
      id:           self.book_id,
      title:        self.title,
      authors:      decode_authors(&self.authors)?,
      cover_image:  self.cover_image,
      genre:        self.genre,
      status:       BookStatus::from(self.status),
      total_pages:  self.total_pages.map(|p| p as u32),
      current_page: self.current_page.map(|p| p as u32),
      started_at:   self.started_at.map(Timestamp::Iso),
      completed_at: self.completed_at.map(Timestamp::Iso),
      notes:        self.notes,
    })
  }
}

/// Raw strings read directly from a `reading_sessions` row.
pub struct RawSession {
  pub session_id:       String,
  pub book_id:          String,
  pub duration_minutes: i64,
  pub pages_read:       Option<i64>,
  pub session_date:     String,
  pub notes:            Option<String>,
}

impl RawSession {
  pub fn into_session(self) -> Result<ReadingSession> {
    Ok(ReadingSession {
      id:               Uuid::parse_str(&self.session_id)?,
      book_id:          self.book_id,
      duration_minutes: self.duration_minutes as u32,
      pages_read:       self.pages_read.map(|p| p as u32),
      session_date:     Timestamp::Iso(self.session_date),
      notes:            self.notes,
    })
  }
}

/// Raw strings read directly from a `wishlist` row.
pub struct RawWishlistEntry {
  pub book_id:     String,
  pub title:       String,
  pub authors:     String,
  pub cover_image: Option<String>,
  pub added_at:    String,
}

impl RawWishlistEntry {
  pub fn into_entry(self) -> Result<WishlistEntry> {
    Ok(WishlistEntry {
      id:          self.book_id,
      title:       self.title,
      authors:     decode_authors(&self.authors)?,
      cover_image: self.cover_image,
      added_at:    Timestamp::Iso(self.added_at),
    })
  }
}
