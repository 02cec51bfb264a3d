//! Handler for `GET /api/user/stats` — the statistics endpoint.
//!
//! Three reads against the store (books, every book's session
//! sub-collection, wishlist), then one pure reduction. All-or-nothing: if
//! any read fails, the request fails; no partial payload is served. The
//! per-book session reads are independent and run concurrently.

use axum::{Json, extract::State};
use chrono::Utc;
use futures::future::try_join_all;

use shelfmark_catalog::Catalog;
use shelfmark_core::{session::ReadingSession, stats::StatsSummary, store::ShelfStore};

use crate::{AppState, auth::CurrentUser, error::ApiError};

/// `GET /api/user/stats`
pub async fn handler<S, C>(
  State(state): State<AppState<S, C>>,
  CurrentUser(user): CurrentUser,
) -> Result<Json<StatsSummary>, ApiError>
where
  S: ShelfStore + Clone + Send + Sync + 'static,
  C: Catalog + Clone + Send + Sync + 'static,
{
  let books = state
    .store
    .list_books(&user)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let sessions: Vec<ReadingSession> =
    try_join_all(books.iter().map(|b| state.store.list_sessions(&user, &b.id)))
      .await
      .map_err(|e| ApiError::Store(Box::new(e)))?
      .into_iter()
      .flatten()
      .collect();

  let wishlist = state
    .store
    .list_wishlist(&user)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok(Json(shelfmark_core::stats::summarize(
    &books,
    &sessions,
    &wishlist,
    Utc::now(),
  )))
}
