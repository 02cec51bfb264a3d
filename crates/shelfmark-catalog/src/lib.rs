//! Typed client for the public book-catalog API (Google Books volumes).
//!
//! The catalog is the source of book metadata: the API layer proxies
//! searches and single-volume lookups through the [`Catalog`] trait so
//! handlers can be tested against a stub instead of the network.

pub mod client;
pub mod error;
pub mod types;

pub use client::GoogleBooks;
pub use error::{Error, Result};
pub use types::{ImageLinks, IndustryIdentifier, Volume, VolumeInfo};

use std::future::Future;

/// Abstraction over the external book catalog.
pub trait Catalog: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Free-text volume search. An empty result set is not an error.
  fn search<'a>(
    &'a self,
    query: &'a str,
  ) -> impl Future<Output = Result<Vec<Volume>, Self::Error>> + Send + 'a;

  /// Look up one volume by catalog id. Returns `None` if the catalog does
  /// not know the id.
  fn volume<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<Volume>, Self::Error>> + Send + 'a;
}
