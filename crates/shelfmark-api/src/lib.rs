//! JSON REST API for Shelfmark.
//!
//! Exposes an axum [`Router`] backed by any [`ShelfStore`] / [`Catalog`]
//! pair. Every `/api/user/*` route requires a bearer token resolved to a
//! user id by [`auth::AuthTokens`]; the catalog proxy routes are open.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = shelfmark_api::router(state);
//! axum::serve(listener, app).await?;
//! ```

pub mod auth;
pub mod books;
pub mod catalog;
pub mod error;
pub mod sessions;
pub mod stats;
pub mod wishlist;

pub use error::ApiError;

use std::{collections::HashMap, path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{delete, get},
};
use serde::Deserialize;
use shelfmark_catalog::Catalog;
use shelfmark_core::store::ShelfStore;

use auth::AuthTokens;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:            String,
  pub port:            u16,
  pub store_path:      PathBuf,
  /// API key passed through to the volume catalog, if one is configured.
  #[serde(default)]
  pub catalog_api_key: Option<String>,
  /// SHA-256 hex digest of each accepted bearer token, mapped to the user
  /// id it authenticates. Generate digests with `server --hash-token`.
  #[serde(default)]
  pub api_tokens:      HashMap<String, String>,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: ShelfStore, C: Catalog> {
  pub store:   Arc<S>,
  pub catalog: Arc<C>,
  pub auth:    Arc<AuthTokens>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised router for the API.
pub fn router<S, C>(state: AppState<S, C>) -> Router
where
  S: ShelfStore + Clone + Send + Sync + 'static,
  C: Catalog + Clone + Send + Sync + 'static,
{
  Router::new()
    // Catalog proxy
    .route("/api/books/search", get(catalog::search::<S, C>))
    .route("/api/books/{id}", get(catalog::details::<S, C>))
    // Shelf
    .route("/api/user/books", get(books::list::<S, C>).post(books::add::<S, C>))
    .route(
      "/api/user/books/{id}",
      get(books::get_one::<S, C>)
        .patch(books::update::<S, C>)
        .delete(books::remove::<S, C>),
    )
    // Sessions
    .route(
      "/api/user/books/{id}/sessions",
      get(sessions::list::<S, C>).post(sessions::add::<S, C>),
    )
    // Wishlist
    .route(
      "/api/user/wishlist",
      get(wishlist::list::<S, C>).post(wishlist::add::<S, C>),
    )
    .route(
      "/api/user/wishlist/{id}",
      delete(wishlist::remove::<S, C>).post(wishlist::promote::<S, C>),
    )
    // Statistics
    .route("/api/user/stats", get(stats::handler::<S, C>))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
