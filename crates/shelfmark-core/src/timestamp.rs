//! The timestamp union accepted on every date-bearing field.
//!
//! Clients and the document store produce dates in four different wire
//! shapes. All of them normalize through [`Timestamp::resolve`] before any
//! arithmetic; a value that cannot be interpreted resolves to the supplied
//! fallback instant rather than failing the request.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A date value in any of the wire shapes the API accepts.
///
/// Variants are tried in declaration order during deserialization, so the
/// two object shapes come before the scalar ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
  /// Store-native raw shape: `{"_seconds": s, "_nanoseconds": ns}`.
  Raw {
    #[serde(rename = "_seconds")]
    seconds: i64,
    #[serde(rename = "_nanoseconds", default)]
    nanos:   u32,
  },
  /// Protobuf-style timestamp object: `{"seconds": s, "nanos": ns}`.
  Proto {
    seconds: i64,
    #[serde(default)]
    nanos:   u32,
  },
  /// Epoch milliseconds — what a native date value becomes in JSON.
  Millis(i64),
  /// RFC 3339 / ISO-8601 string.
  Iso(String),
}

impl Timestamp {
  /// Wrap an instant as the RFC 3339 variant.
  pub fn from_datetime(dt: DateTime<Utc>) -> Self {
    Timestamp::Iso(dt.to_rfc3339())
  }

  /// Normalize to a concrete UTC instant.
  ///
  /// Out-of-range epoch values and unparseable strings resolve to
  /// `fallback` — a deliberate default, not an error.
  pub fn resolve(&self, fallback: DateTime<Utc>) -> DateTime<Utc> {
    match self {
      Timestamp::Raw { seconds, nanos } | Timestamp::Proto { seconds, nanos } => {
        match Utc.timestamp_opt(*seconds, *nanos) {
          chrono::offset::LocalResult::Single(dt) => dt,
          _ => fallback,
        }
      }
      Timestamp::Millis(ms) => match Utc.timestamp_millis_opt(*ms) {
        chrono::offset::LocalResult::Single(dt) => dt,
        _ => fallback,
      },
      Timestamp::Iso(s) => DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(fallback),
    }
  }
}

/// Resolve an optional timestamp; absent values take the fallback.
pub fn resolve_opt(ts: Option<&Timestamp>, fallback: DateTime<Utc>) -> DateTime<Utc> {
  ts.map_or(fallback, |t| t.resolve(fallback))
}
