//! Wishlist entries — catalog titles a user intends to read.
//!
//! An entry lives until it is removed or promoted to a book record.

use serde::{Deserialize, Serialize};

use crate::timestamp::Timestamp;

/// A wishlisted catalog title.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
  /// Catalog volume id.
  pub id:          String,
  pub title:       String,
  #[serde(default)]
  pub authors:     Vec<String>,
  pub cover_image: Option<String>,
  /// Server-assigned at insert time.
  pub added_at:    Timestamp,
}

/// Input for wishlisting a title. `addedAt` is always set by the store.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWishlistEntry {
  pub id:          String,
  pub title:       String,
  #[serde(default)]
  pub authors:     Vec<String>,
  #[serde(default)]
  pub cover_image: Option<String>,
}
