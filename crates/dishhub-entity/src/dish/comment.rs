//! Comments embedded in a dish.
//!
//! The whole comment list is persisted as a single JSON string and is
//! rewritten in full on every change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dishhub_core::types::id::{CommentId, UserId};

/// Persisted value of an empty comment list.
pub const EMPTY_COMMENTS: &str = "[]";

/// A comment on a dish.
///
/// The author's display name is copied in at write time and never
/// re-resolved from the account. Entries written by older clients may
/// lack the name, the body or the timestamp; those read as empty or as
/// the epoch so the rest of the list stays intact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Locally generated identifier.
    pub id: CommentId,
    /// Author account.
    pub user_id: UserId,
    /// Author display name at the time of writing.
    #[serde(default)]
    pub user_name: String,
    /// Comment body.
    #[serde(default)]
    pub comment: String,
    /// Client-side creation time.
    #[serde(default = "unknown_time")]
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Create a comment stamped with a fresh id and the current time.
    pub fn new(user_id: UserId, user_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: CommentId::unique(),
            user_id,
            user_name: user_name.into(),
            comment: text.into(),
            created_at: Utc::now(),
        }
    }
}

fn unknown_time() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH
}

/// Decode a persisted comment list. A blank string is an empty list.
pub fn decode_comments(raw: &str) -> Result<Vec<Comment>, serde_json::Error> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(raw)
}

/// Encode a comment list into its persisted string.
pub fn encode_comments(comments: &[Comment]) -> Result<String, serde_json::Error> {
    serde_json::to_string(comments)
}
