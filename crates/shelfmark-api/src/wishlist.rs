//! Handlers for the wishlist endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/api/user/wishlist` | Newest first |
//! | `POST`   | `/api/user/wishlist` | 409 if wishlisted or already shelved |
//! | `DELETE` | `/api/user/wishlist/:id` | |
//! | `POST`   | `/api/user/wishlist/:id` | Promote the entry to the shelf |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};

use shelfmark_catalog::Catalog;
use shelfmark_core::{
  store::ShelfStore,
  wishlist::{NewWishlistEntry, WishlistEntry},
};

use crate::{AppState, auth::CurrentUser, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /api/user/wishlist`
pub async fn list<S, C>(
  State(state): State<AppState<S, C>>,
  CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<WishlistEntry>>, ApiError>
where
  S: ShelfStore + Clone + Send + Sync + 'static,
  C: Catalog + Clone + Send + Sync + 'static,
{
  let entries = state
    .store
    .list_wishlist(&user)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(entries))
}

// ─── Add ──────────────────────────────────────────────────────────────────────

/// `POST /api/user/wishlist`
pub async fn add<S, C>(
  State(state): State<AppState<S, C>>,
  CurrentUser(user): CurrentUser,
  Json(body): Json<NewWishlistEntry>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ShelfStore + Clone + Send + Sync + 'static,
  C: Catalog + Clone + Send + Sync + 'static,
{
  let already_wishlisted = state
    .store
    .get_wishlist_entry(&user, &body.id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .is_some();
  if already_wishlisted {
    return Err(ApiError::Conflict("book is already in your wishlist".to_owned()));
  }

  let already_shelved = state
    .store
    .get_book(&user, &body.id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .is_some();
  if already_shelved {
    return Err(ApiError::Conflict("book is already in your library".to_owned()));
  }

  let entry = state
    .store
    .add_wishlist_entry(&user, body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(entry)))
}

// ─── Remove ───────────────────────────────────────────────────────────────────

/// `DELETE /api/user/wishlist/:id`
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
    .remove_wishlist_entry(&user, &id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  if !removed {
    return Err(ApiError::NotFound("book not found in wishlist".to_owned()));
  }
  Ok(StatusCode::NO_CONTENT)
}

// ─── Promote ──────────────────────────────────────────────────────────────────

/// `POST /api/user/wishlist/:id` — move the entry onto the shelf.
pub async fn promote<S, C>(
  State(state): State<AppState<S, C>>,
  CurrentUser(user): CurrentUser,
  Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ShelfStore + Clone + Send + Sync + 'static,
  C: Catalog + Clone + Send + Sync + 'static,
{
  let already_shelved = state
    .store
    .get_book(&user, &id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .is_some();
  if already_shelved {
    return Err(ApiError::Conflict("book is already in your library".to_owned()));
  }

  let book = state
    .store
    .promote_wishlist_entry(&user, &id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound("book not found in wishlist".to_owned()))?;
  Ok((StatusCode::CREATED, Json(book)))
}
