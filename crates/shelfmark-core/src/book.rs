//! Book records — a user's tracked entry for one catalog title.
//!
//! The document id is the catalog volume id, so re-adding the same title
//! overwrites rather than duplicates. All meaningful reading progress lives
//! on the record itself; logged sessions are a separate sub-collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timestamp::Timestamp;

// ─── Status ──────────────────────────────────────────────────────────────────

/// Where a book sits in its reading lifecycle.
///
/// Unrecognized strings are preserved verbatim in [`BookStatus::Other`]
/// instead of being rejected; the statistics aggregator counts them in no
/// bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BookStatus {
  NotStarted,
  Reading,
  Completed,
  Abandoned,
  Other(String),
}

impl Default for BookStatus {
  fn default() -> Self {
    BookStatus::NotStarted
  }
}

impl BookStatus {
  /// The wire string for this status.
  pub fn as_str(&self) -> &str {
    match self {
      BookStatus::NotStarted => "notStarted",
      BookStatus::Reading => "reading",
      BookStatus::Completed => "completed",
      BookStatus::Abandoned => "abandoned",
      BookStatus::Other(s) => s,
    }
  }
}

impl From<String> for BookStatus {
  fn from(s: String) -> Self {
    match s.as_str() {
      "notStarted" => BookStatus::NotStarted,
      "reading" => BookStatus::Reading,
      "completed" => BookStatus::Completed,
      "abandoned" => BookStatus::Abandoned,
      _ => BookStatus::Other(s),
    }
  }
}

impl From<BookStatus> for String {
  fn from(s: BookStatus) -> Self {
    s.as_str().to_owned()
  }
}

// ─── Book ────────────────────────────────────────────────────────────────────

/// One tracked title on a user's shelf.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
  /// Catalog volume id.
  pub id:           String,
  pub title:        String,
  #[serde(default)]
  pub authors:      Vec<String>,
  pub cover_image:  Option<String>,
  pub genre:        Option<String>,
  #[serde(default)]
  pub status:       BookStatus,
  pub total_pages:  Option<u32>,
  pub current_page: Option<u32>,
  pub started_at:   Option<Timestamp>,
  pub completed_at: Option<Timestamp>,
  pub notes:        Option<String>,
}

/// Input for adding a book to the shelf. Identical to [`Book`] except every
/// progress field is optional with a default.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
  pub id:           String,
  pub title:        String,
  #[serde(default)]
  pub authors:      Vec<String>,
  #[serde(default)]
  pub cover_image:  Option<String>,
  #[serde(default)]
  pub genre:        Option<String>,
  #[serde(default)]
  pub status:       BookStatus,
  #[serde(default)]
  pub total_pages:  Option<u32>,
  #[serde(default)]
  pub current_page: Option<u32>,
  #[serde(default)]
  pub started_at:   Option<Timestamp>,
  #[serde(default)]
  pub completed_at: Option<Timestamp>,
  #[serde(default)]
  pub notes:        Option<String>,
}

impl From<NewBook> for Book {
  fn from(n: NewBook) -> Self {
    Book {
      id:           n.id,
      title:        n.title,
      authors:      n.authors,
      cover_image:  n.cover_image,
      genre:        n.genre,
      status:       n.status,
      total_pages:  n.total_pages,
      current_page: n.current_page,
      started_at:   n.started_at,
      completed_at: n.completed_at,
      notes:        n.notes,
    }
  }
}

// ─── Patch ───────────────────────────────────────────────────────────────────

/// Partial update for a book record. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPatch {
  pub status:       Option<BookStatus>,
  pub total_pages:  Option<u32>,
  pub current_page: Option<u32>,
  pub genre:        Option<String>,
  pub started_at:   Option<Timestamp>,
  pub completed_at: Option<Timestamp>,
  pub notes:        Option<String>,
}

impl Book {
  /// The patch to apply after logging a session that read `pages_read`
  /// pages at instant `at`.
  ///
  /// Advances `currentPage`, moves `notStarted` books to `reading`
  /// (stamping `startedAt`), and marks a `reading` book `completed` once
  /// the new page reaches `totalPages` (stamping `completedAt`). Books in
  /// any other status keep it.
  pub fn progress_after_session(&self, pages_read: u32, at: DateTime<Utc>) -> BookPatch {
    let current_page = self.current_page.unwrap_or(0) + pages_read;
    let total_pages = self.total_pages.unwrap_or(0);

    let mut status = self.status.clone();
    if total_pages > 0 && current_page >= total_pages && status == BookStatus::Reading {
      status = BookStatus::Completed;
    } else if status == BookStatus::NotStarted {
      status = BookStatus::Reading;
    }

    let started_at = (status == BookStatus::Reading && self.started_at.is_none())
      .then(|| Timestamp::from_datetime(at));
    let completed_at = (status == BookStatus::Completed && self.completed_at.is_none())
      .then(|| Timestamp::from_datetime(at));

    BookPatch {
      status: Some(status),
      current_page: Some(current_page),
      started_at,
      completed_at,
      ..BookPatch::default()
    }
  }

  /// Apply a patch, returning the updated record.
  pub fn with_patch(mut self, patch: BookPatch) -> Self {
    if let Some(status) = patch.status {
      self.status = status;
    }
    if let Some(total_pages) = patch.total_pages {
      self.total_pages = Some(total_pages);
    }
    if let Some(current_page) = patch.current_page {
      self.current_page = Some(current_page);
    }
    if let Some(genre) = patch.genre {
      self.genre = Some(genre);
    }
    if let Some(started_at) = patch.started_at {
      self.started_at = Some(started_at);
    }
    if let Some(completed_at) = patch.completed_at {
      self.completed_at = Some(completed_at);
    }
    if let Some(notes) = patch.notes {
      self.notes = Some(notes);
    }
    self
  }
}
