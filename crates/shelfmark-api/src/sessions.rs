//! Handlers for the reading-session endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/api/user/books/:id/sessions` | Newest first |
//! | `POST` | `/api/user/books/:id/sessions` | Advances the book's progress |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::Utc;

use shelfmark_catalog::Catalog;
use shelfmark_core::{
  session::{NewSession, ReadingSession},
  store::ShelfStore,
};

use crate::{AppState, auth::CurrentUser, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /api/user/books/:id/sessions`
pub async fn list<S, C>(
  State(state): State<AppState<S, C>>,
  CurrentUser(user): CurrentUser,
  Path(id): Path<String>,
) -> Result<Json<Vec<ReadingSession>>, ApiError>
where
  S: ShelfStore + Clone + Send + Sync + 'static,
  C: Catalog + Clone + Send + Sync + 'static,
{
  state
    .store
    .get_book(&user, &id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("book {id} not found")))?;

  let sessions = state
    .store
    .list_sessions(&user, &id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(sessions))
}

// ─── Add ──────────────────────────────────────────────────────────────────────

/// `POST /api/user/books/:id/sessions`
///
/// Logging a session with `pagesRead > 0` also advances the book record:
/// the page counter moves, a `notStarted` book becomes `reading`, and a
/// `reading` book becomes `completed` once the counter reaches its page
/// total. Stamped dates use the session's own date.
pub async fn add<S, C>(
  State(state): State<AppState<S, C>>,
  CurrentUser(user): CurrentUser,
  Path(id): Path<String>,
  Json(body): Json<NewSession>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ShelfStore + Clone + Send + Sync + 'static,
  C: Catalog + Clone + Send + Sync + 'static,
{
  if body.duration_minutes == 0 {
    return Err(ApiError::BadRequest(
      "durationMinutes must be provided and greater than 0".to_owned(),
    ));
  }

  let book = state
    .store
    .get_book(&user, &id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("book {id} not found")))?;

  let session = state
    .store
    .add_session(&user, &id, body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let pages_read = session.pages_read.unwrap_or(0);
  if pages_read > 0 {
    let at = session.session_date.resolve(Utc::now());
    let patch = book.progress_after_session(pages_read, at);
    state
      .store
      .update_book(&user, &id, patch)
      .await
      .map_err(|e| ApiError::Store(Box::new(e)))?;
  }

  Ok((StatusCode::CREATED, Json(session)))
}
