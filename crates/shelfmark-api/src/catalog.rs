//! Handlers proxying the external book catalog.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/api/books/search?q=` | Unauthenticated |
//! | `GET`  | `/api/books/:id` | Unauthenticated; catalog 404 passes through |

use axum::{
  Json,
  extract::{Path, Query, State},
};
use serde::Deserialize;

use shelfmark_catalog::{Catalog, Volume};
use shelfmark_core::store::ShelfStore;

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
  pub q: Option<String>,
}

/// `GET /api/books/search?q=<text>`
pub async fn search<S, C>(
  State(state): State<AppState<S, C>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Volume>>, ApiError>
where
  S: ShelfStore + Clone + Send + Sync + 'static,
  C: Catalog + Clone + Send + Sync + 'static,
{
  let query = params
    .q
    .filter(|q| !q.is_empty())
    .ok_or_else(|| ApiError::BadRequest("query parameter \"q\" is required".to_owned()))?;

  let volumes = state
    .catalog
    .search(&query)
    .await
    .map_err(|e| ApiError::Catalog(Box::new(e)))?;
  Ok(Json(volumes))
}

/// `GET /api/books/:id`
pub async fn details<S, C>(
  State(state): State<AppState<S, C>>,
  Path(id): Path<String>,
) -> Result<Json<Volume>, ApiError>
where
  S: ShelfStore + Clone + Send + Sync + 'static,
  C: Catalog + Clone + Send + Sync + 'static,
{
  let volume = state
    .catalog
    .volume(&id)
    .await
    .map_err(|e| ApiError::Catalog(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound("book not found".to_owned()))?;
  Ok(Json(volume))
}
