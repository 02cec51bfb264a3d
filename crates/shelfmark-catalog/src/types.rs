//! Wire types for catalog volumes.
//!
//! Field set mirrors what the volumes API actually returns; everything
//! beyond the id is optional because the catalog omits fields freely.

use serde::{Deserialize, Serialize};

/// One catalog search result or lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
  pub id:          String,
  #[serde(default)]
  pub volume_info: VolumeInfo,
}

/// The metadata block of a volume.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
  pub title:                Option<String>,
  pub subtitle:             Option<String>,
  pub authors:              Option<Vec<String>>,
  pub publisher:            Option<String>,
  pub published_date:       Option<String>,
  pub description:          Option<String>,
  pub image_links:          Option<ImageLinks>,
  pub page_count:           Option<u32>,
  pub categories:           Option<Vec<String>>,
  pub language:             Option<String>,
  pub industry_identifiers: Option<Vec<IndustryIdentifier>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
  pub thumbnail:       Option<String>,
  pub small_thumbnail: Option<String>,
}

/// An ISBN or other identifier attached to a volume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndustryIdentifier {
  #[serde(rename = "type")]
  pub kind:       String,
  pub identifier: String,
}

/// The envelope of a search response; `items` is absent when nothing
/// matched.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
  #[serde(default)]
  pub items: Option<Vec<Volume>>,
}
