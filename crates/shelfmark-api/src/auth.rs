//! Bearer-token verification and the `CurrentUser` extractor.
//!
//! Identity verification is a collaborator seam: handlers only see the user
//! id an accepted token resolves to. The bundled implementation keeps a map
//! from SHA-256 token digest to user id (loaded from the server config), so
//! plaintext tokens are never stored server-side.

use std::collections::HashMap;

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, request::Parts},
};
use sha2::{Digest as _, Sha256};

use shelfmark_core::store::ShelfStore;
use shelfmark_catalog::Catalog;

use crate::{AppState, error::ApiError};

/// Accepted bearer tokens, keyed by SHA-256 hex digest.
#[derive(Clone, Default)]
pub struct AuthTokens {
  tokens: HashMap<String, String>,
}

impl AuthTokens {
  /// `tokens` maps the hex digest of each accepted token to the user id it
  /// authenticates.
  pub fn new(tokens: HashMap<String, String>) -> Self {
    Self { tokens }
  }

  /// The hex SHA-256 digest of a plaintext token — what goes in the config.
  pub fn digest(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
  }

  /// Resolve the request's bearer credential to a user id.
  pub fn verify(&self, headers: &HeaderMap) -> Result<String, ApiError> {
    let header_val = headers
      .get(axum::http::header::AUTHORIZATION)
      .and_then(|v| v.to_str().ok())
      .ok_or(ApiError::Unauthorized)?;

    let token = header_val
      .strip_prefix("Bearer ")
      .ok_or(ApiError::Unauthorized)?;

    self
      .tokens
      .get(&Self::digest(token))
      .cloned()
      .ok_or(ApiError::Unauthorized)
  }
}

/// Present in a handler's arguments means the request carried a valid bearer
/// token; the inner value is the authenticated user id.
pub struct CurrentUser(pub String);

impl<S, C> FromRequestParts<AppState<S, C>> for CurrentUser
where
  S: ShelfStore + Clone + Send + Sync + 'static,
  C: Catalog + Clone + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S, C>,
  ) -> Result<Self, Self::Rejection> {
    let user = state.auth.verify(&parts.headers)?;
    Ok(CurrentUser(user))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::http::header;

  fn tokens() -> AuthTokens {
    let mut map = HashMap::new();
    map.insert(AuthTokens::digest("secret-token"), "u1".to_owned());
    AuthTokens::new(map)
  }

  fn headers_with(value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, value.parse().unwrap());
    headers
  }

  #[test]
  fn accepted_token_resolves_to_its_user() {
    let user = tokens().verify(&headers_with("Bearer secret-token")).unwrap();
    assert_eq!(user, "u1");
  }

  #[test]
  fn unknown_token_is_rejected() {
    let result = tokens().verify(&headers_with("Bearer wrong"));
    assert!(matches!(result, Err(ApiError::Unauthorized)));
  }

  #[test]
  fn missing_header_is_rejected() {
    let result = tokens().verify(&HeaderMap::new());
    assert!(matches!(result, Err(ApiError::Unauthorized)));
  }

  #[test]
  fn non_bearer_scheme_is_rejected() {
    let result = tokens().verify(&headers_with("Basic dXNlcjpwYXNz"));
    assert!(matches!(result, Err(ApiError::Unauthorized)));
  }
}
