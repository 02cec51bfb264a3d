//! Reading sessions — one logged reading event tied to a book.
//!
//! Sessions are immutable once recorded; there is no update or delete path.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::timestamp::Timestamp;

/// A logged reading event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingSession {
  pub id:               Uuid,
  /// The owning book record's id.
  pub book_id:          String,
  pub duration_minutes: u32,
  pub pages_read:       Option<u32>,
  pub session_date:     Timestamp,
  pub notes:            Option<String>,
}

/// Input for logging a session. The id is assigned by the store; an absent
/// or unparseable `sessionDate` resolves to the time of logging.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSession {
  pub duration_minutes: u32,
  #[serde(default)]
  pub pages_read:       Option<u32>,
  #[serde(default)]
  pub session_date:     Option<Timestamp>,
  #[serde(default)]
  pub notes:            Option<String>,
}
