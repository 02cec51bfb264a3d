//! The `ShelfStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `shelfmark-store-sqlite`). The API layer depends on this abstraction,
//! not on any concrete backend. Every collection is scoped to one user;
//! there is no cross-user read.
//!
//! "Not found" is a value (`Ok(None)` / `Ok(false)`), not an error —
//! backends report only genuine storage failures through `Self::Error`.
//!
//! All methods return `Send` futures so the trait can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use crate::{
  book::{Book, BookPatch, NewBook},
  session::{NewSession, ReadingSession},
  wishlist::{NewWishlistEntry, WishlistEntry},
};

pub trait ShelfStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Books ─────────────────────────────────────────────────────────────

  /// All book records for `user`, in shelf insertion order.
  fn list_books<'a>(
    &'a self,
    user: &'a str,
  ) -> impl Future<Output = Result<Vec<Book>, Self::Error>> + Send + 'a;

  /// One book record. Returns `None` if the title is not on the shelf.
  fn get_book<'a>(
    &'a self,
    user: &'a str,
    book_id: &'a str,
  ) -> impl Future<Output = Result<Option<Book>, Self::Error>> + Send + 'a;

  /// Insert or overwrite a book record (document id = catalog id).
  /// Overwriting keeps the record's original shelf insertion position.
  fn put_book<'a>(
    &'a self,
    user: &'a str,
    book: NewBook,
  ) -> impl Future<Output = Result<Book, Self::Error>> + Send + 'a;

  /// Apply a partial update. Returns the updated record, or `None` if the
  /// book is not on the shelf.
  fn update_book<'a>(
    &'a self,
    user: &'a str,
    book_id: &'a str,
    patch: BookPatch,
  ) -> impl Future<Output = Result<Option<Book>, Self::Error>> + Send + 'a;

  /// Remove a book record and its session sub-collection. Returns whether
  /// anything was removed.
  fn delete_book<'a>(
    &'a self,
    user: &'a str,
    book_id: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  // ── Reading sessions ──────────────────────────────────────────────────

  /// All sessions for one book, newest first.
  fn list_sessions<'a>(
    &'a self,
    user: &'a str,
    book_id: &'a str,
  ) -> impl Future<Output = Result<Vec<ReadingSession>, Self::Error>> + Send + 'a;

  /// Record a session. The id is store-assigned; the session is immutable
  /// afterwards.
  fn add_session<'a>(
    &'a self,
    user: &'a str,
    book_id: &'a str,
    session: NewSession,
  ) -> impl Future<Output = Result<ReadingSession, Self::Error>> + Send + 'a;

  // ── Wishlist ──────────────────────────────────────────────────────────

  /// All wishlist entries for `user`, newest first.
  fn list_wishlist<'a>(
    &'a self,
    user: &'a str,
  ) -> impl Future<Output = Result<Vec<WishlistEntry>, Self::Error>> + Send + 'a;

  /// One wishlist entry, or `None`.
  fn get_wishlist_entry<'a>(
    &'a self,
    user: &'a str,
    entry_id: &'a str,
  ) -> impl Future<Output = Result<Option<WishlistEntry>, Self::Error>> + Send + 'a;

  /// Add an entry with a store-assigned `addedAt`.
  fn add_wishlist_entry<'a>(
    &'a self,
    user: &'a str,
    entry: NewWishlistEntry,
  ) -> impl Future<Output = Result<WishlistEntry, Self::Error>> + Send + 'a;

  /// Remove an entry. Returns whether anything was removed.
  fn remove_wishlist_entry<'a>(
    &'a self,
    user: &'a str,
    entry_id: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Atomically move an entry onto the shelf as a fresh `notStarted` book
  /// record. Returns the created record, or `None` if the entry does not
  /// exist.
  fn promote_wishlist_entry<'a>(
    &'a self,
    user: &'a str,
    entry_id: &'a str,
  ) -> impl Future<Output = Result<Option<Book>, Self::Error>> + Send + 'a;
}
