//! The reqwest-backed catalog client.

use std::time::Duration;

use reqwest::{Client, StatusCode};

use crate::{Catalog, Error, Result, Volume, types::SearchResponse};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/books/v1/volumes";

/// Client for the public volumes API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct GoogleBooks {
  client:   Client,
  base_url: String,
  api_key:  Option<String>,
}

impl GoogleBooks {
  pub fn new(api_key: Option<String>) -> Result<Self> {
    Self::with_base_url(api_key, DEFAULT_BASE_URL)
  }

  /// Point the client at a different volumes endpoint — used by tests.
  pub fn with_base_url(api_key: Option<String>, base_url: impl Into<String>) -> Result<Self> {
    let client = Client::builder()
      .user_agent("shelfmark/0.1")
      .timeout(Duration::from_secs(30))
      .build()?;
    Ok(Self {
      client,
      base_url: base_url.into(),
      api_key,
    })
  }

  fn keyed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    match &self.api_key {
      Some(key) => req.query(&[("key", key.as_str())]),
      None => req,
    }
  }
}

impl Catalog for GoogleBooks {
  type Error = Error;

  async fn search(&self, query: &str) -> Result<Vec<Volume>> {
    let resp = self
      .keyed(self.client.get(&self.base_url).query(&[("q", query)]))
      .send()
      .await?;

    if !resp.status().is_success() {
      return Err(Error::Status(resp.status()));
    }

    let body: SearchResponse = resp.json().await?;
    Ok(body.items.unwrap_or_default())
  }

  async fn volume(&self, id: &str) -> Result<Option<Volume>> {
    let url = format!("{}/{id}", self.base_url);
    let resp = self.keyed(self.client.get(&url)).send().await?;

    if resp.status() == StatusCode::NOT_FOUND {
      return Ok(None);
    }
    if !resp.status().is_success() {
      return Err(Error::Status(resp.status()));
    }

    Ok(Some(resp.json().await?))
  }
}
