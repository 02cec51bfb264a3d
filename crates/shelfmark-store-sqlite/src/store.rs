//! [`SqliteStore`] — the SQLite implementation of [`ShelfStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use shelfmark_core::{
  Timestamp,
  book::{Book, BookPatch, BookStatus, NewBook},
  session::{NewSession, ReadingSession},
  store::ShelfStore,
  wishlist::{NewWishlistEntry, WishlistEntry},
};

use crate::{
  Error, Result,
  encode::{
    RawBook, RawSession, RawWishlistEntry, encode_authors, encode_dt, encode_status,
    encode_ts_opt,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Shelfmark store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

const BOOK_COLUMNS: &str = "book_id, title, authors, cover_image, genre, status, \
                            total_pages, current_page, started_at, completed_at, notes";

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

/// Pin every date on the record to its stored RFC 3339 form, so callers see
/// exactly what a subsequent read would return.
fn with_resolved_dates(book: Book, now: DateTime<Utc>) -> Book {
  Book {
    started_at:   encode_ts_opt(book.started_at.as_ref(), now).map(Timestamp::Iso),
    completed_at: encode_ts_opt(book.completed_at.as_ref(), now).map(Timestamp::Iso),
    ..book
  }
}

fn read_book_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<RawBook> {
  Ok(RawBook {
    book_id:      r.get(0)?,
    title:        r.get(1)?,
    authors:      r.get(2)?,
    cover_image:  r.get(3)?,
    genre:        r.get(4)?,
    status:       r.get(5)?,
    total_pages:  r.get(6)?,
    current_page: r.get(7)?,
    started_at:   r.get(8)?,
    completed_at: r.get(9)?,
    notes:        r.get(10)?,
  })
}

// ─── ShelfStore impl ─────────────────────────────────────────────────────────

impl ShelfStore for SqliteStore {
  type Error = Error;

  // ── Books ─────────────────────────────────────────────────────────────

  async fn list_books(&self, user: &str) -> Result<Vec<Book>> {
    let user = user.to_owned();
    let raws: Vec<RawBook> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {BOOK_COLUMNS} FROM books WHERE user_id = ?1 ORDER BY added_at, book_id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![user], read_book_row)?
          .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawBook::into_book).collect()
  }

  async fn get_book(&self, user: &str, book_id: &str) -> Result<Option<Book>> {
    let user = user.to_owned();
    let book_id = book_id.to_owned();
    let raw: Option<RawBook> = self
      .conn
      .call(move |conn| {
        let row = conn
          .query_row(
            &format!("SELECT {BOOK_COLUMNS} FROM books WHERE user_id = ?1 AND book_id = ?2"),
            rusqlite::params![user, book_id],
            read_book_row,
          )
          .optional()?;
        Ok(row)
      })
      .await?;

    raw.map(RawBook::into_book).transpose()
  }

  async fn put_book(&self, user: &str, book: NewBook) -> Result<Book> {
    let now = Utc::now();
    let book = with_resolved_dates(Book::from(book), now);

    let user = user.to_owned();
    let authors_str = encode_authors(&book.authors)?;
    let added_at_str = encode_dt(now);
    let b = book.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO books (
             user_id, book_id, title, authors, cover_image, genre, status,
             total_pages, current_page, started_at, completed_at, notes, added_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
           ON CONFLICT (user_id, book_id) DO UPDATE SET
             title        = excluded.title,
             authors      = excluded.authors,
             cover_image  = excluded.cover_image,
             genre        = excluded.genre,
             status       = excluded.status,
             total_pages  = excluded.total_pages,
             current_page = excluded.current_page,
             started_at   = excluded.started_at,
             completed_at = excluded.completed_at,
             notes        = excluded.notes",
          rusqlite::params![
            user,
            b.id,
            b.title,
            authors_str,
            b.cover_image,
            b.genre,
            encode_status(&b.status),
            b.total_pages,
            b.current_page,
            encode_ts_opt(b.started_at.as_ref(), now),
            encode_ts_opt(b.completed_at.as_ref(), now),
            b.notes,
            added_at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(book)
  }

  async fn update_book(&self, user: &str, book_id: &str, patch: BookPatch) -> Result<Option<Book>> {
    let Some(book) = self.get_book(user, book_id).await? else {
      return Ok(None);
    };

    let now = Utc::now();
    let updated = with_resolved_dates(book.with_patch(patch), now);

    let user = user.to_owned();
    let book_id = book_id.to_owned();
    let b = updated.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE books SET
             status = ?3, total_pages = ?4, current_page = ?5, genre = ?6,
             started_at = ?7, completed_at = ?8, notes = ?9
           WHERE user_id = ?1 AND book_id = ?2",
          rusqlite::params![
            user,
            book_id,
            encode_status(&b.status),
            b.total_pages,
            b.current_page,
            b.genre,
            encode_ts_opt(b.started_at.as_ref(), now),
            encode_ts_opt(b.completed_at.as_ref(), now),
            b.notes,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(Some(updated))
  }

  async fn delete_book(&self, user: &str, book_id: &str) -> Result<bool> {
    let user = user.to_owned();
    let book_id = book_id.to_owned();
    let removed = self
      .conn
      .call(move |conn| {
        // Session rows go with the book via ON DELETE CASCADE.
        let n = conn.execute(
          "DELETE FROM books WHERE user_id = ?1 AND book_id = ?2",
          rusqlite::params![user, book_id],
        )?;
        Ok(n > 0)
      })
      .await?;
    Ok(removed)
  }

  // ── Reading sessions ──────────────────────────────────────────────────

  async fn list_sessions(&self, user: &str, book_id: &str) -> Result<Vec<ReadingSession>> {
    let user = user.to_owned();
    let book_id = book_id.to_owned();
    let raws: Vec<RawSession> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT session_id, book_id, duration_minutes, pages_read, session_date, notes
           FROM reading_sessions
           WHERE user_id = ?1 AND book_id = ?2
           ORDER BY session_date DESC, session_id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user, book_id], |r| {
            Ok(RawSession {
              session_id:       r.get(0)?,
              book_id:          r.get(1)?,
              duration_minutes: r.get(2)?,
              pages_read:       r.get(3)?,
              session_date:     r.get(4)?,
              notes:            r.get(5)?,
            })
          })?
          .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSession::into_session).collect()
  }

  async fn add_session(&self, user: &str, book_id: &str, session: NewSession) -> Result<ReadingSession> {
    let now = Utc::now();
    let session_date_str =
      encode_dt(session.session_date.as_ref().map_or(now, |t| t.resolve(now)));
    let stored = ReadingSession {
      id:               Uuid::new_v4(),
      book_id:          book_id.to_owned(),
      duration_minutes: session.duration_minutes,
      pages_read:       session.pages_read,
      session_date:     Timestamp::Iso(session_date_str.clone()),
      notes:            session.notes,
    };

    let user = user.to_owned();
    let s = stored.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO reading_sessions (
             session_id, user_id, book_id, duration_minutes, pages_read, session_date, notes
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            s.id.hyphenated().to_string(),
            user,
            s.book_id,
            s.duration_minutes,
            s.pages_read,
            session_date_str,
            s.notes,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(stored)
  }

  // ── Wishlist ──────────────────────────────────────────────────────────

  async fn list_wishlist(&self, user: &str) -> Result<Vec<WishlistEntry>> {
    let user = user.to_owned();
    let raws: Vec<RawWishlistEntry> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT book_id, title, authors, cover_image, added_at
           FROM wishlist WHERE user_id = ?1
           ORDER BY added_at DESC, book_id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user], |r| {
            Ok(RawWishlistEntry {
              book_id:     r.get(0)?,
              title:       r.get(1)?,
              authors:     r.get(2)?,
              cover_image: r.get(3)?,
              added_at:    r.get(4)?,
            })
          })?
          .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawWishlistEntry::into_entry).collect()
  }

  async fn get_wishlist_entry(&self, user: &str, entry_id: &str) -> Result<Option<WishlistEntry>> {
    let user = user.to_owned();
    let entry_id = entry_id.to_owned();
    let raw: Option<RawWishlistEntry> = self
      .conn
      .call(move |conn| {
        let row = conn
          .query_row(
            "SELECT book_id, title, authors, cover_image, added_at
             FROM wishlist WHERE user_id = ?1 AND book_id = ?2",
            rusqlite::params![user, entry_id],
            |r| {
              Ok(RawWishlistEntry {
                book_id:     r.get(0)?,
                title:       r.get(1)?,
                authors:     r.get(2)?,
                cover_image: r.get(3)?,
                added_at:    r.get(4)?,
              })
            },
          )
          .optional()?;
        Ok(row)
      })
      .await?;

    raw.map(RawWishlistEntry::into_entry).transpose()
  }

  async fn add_wishlist_entry(&self, user: &str, entry: NewWishlistEntry) -> Result<WishlistEntry> {
    let added_at_str = encode_dt(Utc::now());
    let stored = WishlistEntry {
      id:          entry.id,
      title:       entry.title,
      authors:     entry.authors,
      cover_image: entry.cover_image,
      added_at:    Timestamp::Iso(added_at_str.clone()),
    };

    let user = user.to_owned();
    let authors_str = encode_authors(&stored.authors)?;
    let e = stored.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO wishlist (user_id, book_id, title, authors, cover_image, added_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![user, e.id, e.title, authors_str, e.cover_image, added_at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(stored)
  }

  async fn remove_wishlist_entry(&self, user: &str, entry_id: &str) -> Result<bool> {
    let user = user.to_owned();
    let entry_id = entry_id.to_owned();
    let removed = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "DELETE FROM wishlist WHERE user_id = ?1 AND book_id = ?2",
          rusqlite::params![user, entry_id],
        )?;
        Ok(n > 0)
      })
      .await?;
    Ok(removed)
  }

  async fn promote_wishlist_entry(&self, user: &str, entry_id: &str) -> Result<Option<Book>> {
    let user = user.to_owned();
    let entry_id = entry_id.to_owned();
    let now = Utc::now();
    let added_at_str = encode_dt(now);

    let raw: Option<RawWishlistEntry> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let row = tx
          .query_row(
            "SELECT book_id, title, authors, cover_image, added_at
             FROM wishlist WHERE user_id = ?1 AND book_id = ?2",
            rusqlite::params![user, entry_id],
            |r| {
              Ok(RawWishlistEntry {
                book_id:     r.get(0)?,
                title:       r.get(1)?,
                authors:     r.get(2)?,
                cover_image: r.get(3)?,
                added_at:    r.get(4)?,
              })
            },
          )
          .optional()?;

        let Some(entry) = row else {
          return Ok(None);
        };

        tx.execute(
          "INSERT INTO books (
             user_id, book_id, title, authors, cover_image, status, current_page, added_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, 'notStarted', 0, ?6)",
          rusqlite::params![
            user,
            entry.book_id,
            entry.title,
            entry.authors,
            entry.cover_image,
            added_at_str,
          ],
        )?;
        tx.execute(
          "DELETE FROM wishlist WHERE user_id = ?1 AND book_id = ?2",
          rusqlite::params![user, entry_id],
        )?;

        tx.commit()?;
        Ok(Some(entry))
      })
      .await?;

    let Some(entry) = raw else {
      return Ok(None);
    };

    Ok(Some(Book {
      id:           entry.book_id,
      title:        entry.title,
      authors:      crate::encode::decode_authors(&entry.authors)?,
      cover_image:  entry.cover_image,
      genre:        None,
      status:       BookStatus::NotStarted,
      total_pages:  None,
      current_page: Some(0),
      started_at:   None,
      completed_at: None,
      notes:        None,
    }))
  }
}
