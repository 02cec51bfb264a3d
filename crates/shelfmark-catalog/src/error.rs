//! Error type for `shelfmark-catalog`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  /// The catalog answered with a non-success status other than 404.
  #[error("catalog returned status {0}")]
  Status(reqwest::StatusCode),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
