//! Handlers for the shelf endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/api/user/books` | Shelf insertion order |
//! | `POST`   | `/api/user/books` | Set semantics: re-adding overwrites |
//! | `GET`    | `/api/user/books/:id` | Joined with catalog volume metadata |
//! | `PATCH`  | `/api/user/books/:id` | Partial update |
//! | `DELETE` | `/api/user/books/:id` | Removes the session sub-collection too |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Serialize;

use shelfmark_catalog::{Catalog, VolumeInfo};
use shelfmark_core::{
  book::{Book, BookPatch, NewBook},
  store::ShelfStore,
};

use crate::{AppState, auth::CurrentUser, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /api/user/books`
pub async fn list<S, C>(
  State(state): State<AppState<S, C>>,
  CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Book>>, ApiError>
where
  S: ShelfStore + Clone + Send + Sync + 'static,
  C: Catalog + Clone + Send + Sync + 'static,
{
  let books = state
    .store
    .list_books(&user)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(books))
}

// ─── Add ──────────────────────────────────────────────────────────────────────

/// `POST /api/user/books` — body: a full book record.
pub async fn add<S, C>(
  State(state): State<AppState<S, C>>,
  CurrentUser(user): CurrentUser,
  Json(body): Json<NewBook>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ShelfStore + Clone + Send + Sync + 'static,
  C: Catalog + Clone + Send + Sync + 'static,
{
  let book = state
    .store
    .put_book(&user, body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(book)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// A shelf record joined with the catalog's metadata for the same volume.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookWithVolume {
  pub id:          String,
  pub user_info:   Book,
  pub volume_info: Option<VolumeInfo>,
}

/// `GET /api/user/books/:id`
///
/// A catalog failure degrades to `volumeInfo: null` — the shelf record is
/// still served.
pub async fn get_one<S, C>(
  State(state): State<AppState<S, C>>,
  CurrentUser(user): CurrentUser,
  Path(id): Path<String>,
) -> Result<Json<BookWithVolume>, ApiError>
where
  S: ShelfStore + Clone + Send + Sync + 'static,
  C: Catalog + Clone + Send + Sync + 'static,
{
  let book = state
    .store
    .get_book(&user, &id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("book {id} not found")))?;

  let volume_info = match state.catalog.volume(&id).await {
    Ok(volume) => volume.map(|v| v.volume_info),
    Err(e) => {
      tracing::warn!(error = %e, book_id = %id, "catalog lookup failed");
      None
    }
  };

  Ok(Json(BookWithVolume {
    id: book.id.clone(),
    user_info: book,
    volume_info,
  }))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PATCH /api/user/books/:id` — body: any subset of the mutable fields.
pub async fn update<S, C>(
  State(state): State<AppState<S, C>>,
  CurrentUser(user): CurrentUser,
  Path(id): Path<String>,
  Json(patch): Json<BookPatch>,
) -> Result<Json<Book>, ApiError>
where
  S: ShelfStore + Clone + Send + Sync + 'static,
  C: Catalog + Clone + Send + Sync + 'static,
{
  let book = state
    .store
    .update_book(&user, &id, patch)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("book {id} not found")))?;
  Ok(Json(book))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /api/user/books/:id`
pub async fn remove<S, C>(
  State(state): State<AppState<S, C>>,
  CurrentUser(user): CurrentUser,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: ShelfStore + Clone + Send + Sync + 'static,
  C: Catalog + Clone + Send + Sync + 'static,
{
  let removed = state
    .store
    .delete_book(&user, &id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  if !removed {
    return Err(ApiError::NotFound(format!("book {id} not found")));
  }
  Ok(StatusCode::NO_CONTENT)
}
