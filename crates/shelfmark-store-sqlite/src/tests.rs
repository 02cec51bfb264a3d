//! Integration tests for `SqliteStore` against an in-memory database.

use std::time::Duration;

use shelfmark_core::{
  Timestamp,
  book::{BookPatch, BookStatus, NewBook},
  session::NewSession,
  store::ShelfStore,
  wishlist::NewWishlistEntry,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory().await.expect("in-memory store")
}

fn new_book(id: &str, title: &str) -> NewBook {
  NewBook {
    id:           id.into(),
    title:        title.into(),
    authors:      vec!["Ursula K. Le Guin".into()],
    cover_image:  None,
    genre:        Some("Fantasy".into()),
    status:       BookStatus::NotStarted,
    total_pages:  Some(200),
    current_page: None,
    started_at:   None,
    completed_at: None,
    notes:        None,
  }
}

fn new_session(minutes: u32, pages: Option<u32>, date: Option<&str>) -> NewSession {
  NewSession {
    duration_minutes: minutes,
    pages_read:       pages,
    session_date:     date.map(|d| Timestamp::Iso(d.into())),
    notes:            None,
  }
}

// ─── Books ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn put_and_get_book() {
  let s = store().await;

  let put = s.put_book("u1", new_book("vol-1", "A Wizard of Earthsea")).await.unwrap();
  assert_eq!(put.id, "vol-1");

  let fetched = s.get_book("u1", "vol-1").await.unwrap().unwrap();
  assert_eq!(fetched.title, "A Wizard of Earthsea");
  assert_eq!(fetched.authors, vec!["Ursula K. Le Guin".to_owned()]);
  assert_eq!(fetched.status, BookStatus::NotStarted);
  assert_eq!(fetched.total_pages, Some(200));
}

#[tokio::test]
async fn get_book_missing_returns_none() {
  let s = store().await;
  assert!(s.get_book("u1", "nope").await.unwrap().is_none());
}

#[tokio::test]
async fn list_books_in_shelf_insertion_order() {
  let s = store().await;
  s.put_book("u1", new_book("first", "First")).await.unwrap();
  tokio::time::sleep(Duration::from_millis(5)).await;
  s.put_book("u1", new_book("second", "Second")).await.unwrap();

  let books = s.list_books("u1").await.unwrap();
  let ids: Vec<&str> = books.iter().map(|b| b.id.as_str()).collect();
  assert_eq!(ids, vec!["first", "second"]);
}

#[tokio::test]
async fn re_adding_overwrites_without_moving_shelf_position() {
  let s = store().await;
  s.put_book("u1", new_book("a", "Original")).await.unwrap();
  tokio::time::sleep(Duration::from_millis(5)).await;
  s.put_book("u1", new_book("b", "Other")).await.unwrap();
  tokio::time::sleep(Duration::from_millis(5)).await;
  s.put_book("u1", new_book("a", "Replaced")).await.unwrap();

  let books = s.list_books("u1").await.unwrap();
  assert_eq!(books.len(), 2);
  assert_eq!(books[0].id, "a");
  assert_eq!(books[0].title, "Replaced");
}

#[tokio::test]
async fn update_book_applies_patch() {
  let s = store().await;
  s.put_book("u1", new_book("a", "Book")).await.unwrap();

  let patch = BookPatch {
    status: Some(BookStatus::Reading),
    current_page: Some(42),
    ..BookPatch::default()
  };
  let updated = s.update_book("u1", "a", patch).await.unwrap().unwrap();
  assert_eq!(updated.status, BookStatus::Reading);
  assert_eq!(updated.current_page, Some(42));
  // Untouched fields survive.
  assert_eq!(updated.total_pages, Some(200));

  let fetched = s.get_book("u1", "a").await.unwrap().unwrap();
  assert_eq!(fetched.status, BookStatus::Reading);
  assert_eq!(fetched.current_page, Some(42));
}

#[tokio::test]
async fn update_missing_book_returns_none() {
  let s = store().await;
  let result = s.update_book("u1", "nope", BookPatch::default()).await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn unrecognized_status_round_trips() {
  let s = store().await;
  let mut book = new_book("a", "Book");
  book.status = BookStatus::Other("paused".into());
  s.put_book("u1", book).await.unwrap();

  let fetched = s.get_book("u1", "a").await.unwrap().unwrap();
  assert_eq!(fetched.status, BookStatus::Other("paused".into()));
}

#[tokio::test]
async fn delete_book_cascades_to_sessions() {
  let s = store().await;
  s.put_book("u1", new_book("a", "Book")).await.unwrap();
  s.add_session("u1", "a", new_session(30, Some(10), None)).await.unwrap();

  assert!(s.delete_book("u1", "a").await.unwrap());
  assert!(s.get_book("u1", "a").await.unwrap().is_none());
  assert!(s.list_sessions("u1", "a").await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_missing_book_returns_false() {
  let s = store().await;
  assert!(!s.delete_book("u1", "nope").await.unwrap());
}

#[tokio::test]
async fn books_are_scoped_per_user() {
  let s = store().await;
  s.put_book("u1", new_book("a", "Mine")).await.unwrap();

  assert!(s.list_books("u2").await.unwrap().is_empty());
  assert!(s.get_book("u2", "a").await.unwrap().is_none());
}

// ─── Reading sessions ────────────────────────────────────────────────────────

#[tokio::test]
async fn add_session_assigns_id_and_stores_the_date() {
  let s = store().await;
  s.put_book("u1", new_book("a", "Book")).await.unwrap();

  let session = s
    .add_session("u1", "a", new_session(45, Some(20), Some("2024-03-01T10:00:00Z")))
    .await
    .unwrap();
  assert_eq!(session.book_id, "a");
  assert_eq!(session.duration_minutes, 45);

  let listed = s.list_sessions("u1", "a").await.unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].id, session.id);
  assert_eq!(listed[0].pages_read, Some(20));
}

#[tokio::test]
async fn sessions_list_newest_first() {
  let s = store().await;
  s.put_book("u1", new_book("a", "Book")).await.unwrap();
  s.add_session("u1", "a", new_session(10, None, Some("2024-01-01T10:00:00Z"))).await.unwrap();
  s.add_session("u1", "a", new_session(20, None, Some("2024-02-01T10:00:00Z"))).await.unwrap();

  let listed = s.list_sessions("u1", "a").await.unwrap();
  assert_eq!(listed[0].duration_minutes, 20);
  assert_eq!(listed[1].duration_minutes, 10);
}

#[tokio::test]
async fn epoch_millis_session_date_is_normalized_to_rfc3339() {
  let s = store().await;
  s.put_book("u1", new_book("a", "Book")).await.unwrap();

  let input = NewSession {
    duration_minutes: 30,
    pages_read:       None,
    session_date:     Some(Timestamp::Millis(1_700_000_000_000)),
    notes:            None,
  };
  s.add_session("u1", "a", input).await.unwrap();

  let listed = s.list_sessions("u1", "a").await.unwrap();
  match &listed[0].session_date {
    Timestamp::Iso(iso) => assert!(iso.starts_with("2023-11-14T22:13:20")),
    other => panic!("expected stored RFC 3339 string, got {other:?}"),
  }
}

// ─── Wishlist ────────────────────────────────────────────────────────────────

fn wish(id: &str, title: &str) -> NewWishlistEntry {
  NewWishlistEntry {
    id:          id.into(),
    title:       title.into(),
    authors:     vec!["Ted Chiang".into()],
    cover_image: None,
  }
}

#[tokio::test]
async fn wishlist_add_get_remove() {
  let s = store().await;
  let added = s.add_wishlist_entry("u1", wish("w1", "Exhalation")).await.unwrap();
  assert_eq!(added.id, "w1");

  let fetched = s.get_wishlist_entry("u1", "w1").await.unwrap().unwrap();
  assert_eq!(fetched.title, "Exhalation");

  assert!(s.remove_wishlist_entry("u1", "w1").await.unwrap());
  assert!(s.get_wishlist_entry("u1", "w1").await.unwrap().is_none());
  assert!(!s.remove_wishlist_entry("u1", "w1").await.unwrap());
}

#[tokio::test]
async fn wishlist_lists_newest_first() {
  let s = store().await;
  s.add_wishlist_entry("u1", wish("older", "Older")).await.unwrap();
  tokio::time::sleep(Duration::from_millis(5)).await;
  s.add_wishlist_entry("u1", wish("newer", "Newer")).await.unwrap();

  let entries = s.list_wishlist("u1").await.unwrap();
  let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
  assert_eq!(ids, vec!["newer", "older"]);
}

#[tokio::test]
async fn promote_moves_entry_to_the_shelf() {
  let s = store().await;
  s.add_wishlist_entry("u1", wish("w1", "Exhalation")).await.unwrap();

  let book = s.promote_wishlist_entry("u1", "w1").await.unwrap().unwrap();
  assert_eq!(book.id, "w1");
  assert_eq!(book.status, BookStatus::NotStarted);
  assert_eq!(book.current_page, Some(0));
  assert_eq!(book.total_pages, None);

  // Entry is gone, book is on the shelf.
  assert!(s.get_wishlist_entry("u1", "w1").await.unwrap().is_none());
  let shelved = s.get_book("u1", "w1").await.unwrap().unwrap();
  assert_eq!(shelved.title, "Exhalation");
  assert_eq!(shelved.authors, vec!["Ted Chiang".to_owned()]);
}

#[tokio::test]
async fn promote_missing_entry_returns_none() {
  let s = store().await;
  assert!(s.promote_wishlist_entry("u1", "nope").await.unwrap().is_none());
}
