//! Signed-in user model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dishhub_core::types::id::UserId;
use dishhub_core::types::record::AccountRecord;

/// The account behind the current session. Owned by the platform; this
/// system only mirrors it in memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Account id.
    pub id: UserId,
    /// Display name, if the account has one.
    pub name: Option<String>,
    /// Email address.
    pub email: String,
    /// Account creation time.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Name shown next to the user's dishes and comments, falling back
    /// to the email address.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.email,
        }
    }
}

impl From<AccountRecord> for User {
    fn from(record: AccountRecord) -> Self {
        let name = Some(record.name).filter(|n| !n.trim().is_empty());
        Self {
            id: record.id,
            name,
            email: record.email,
            created_at: record.created_at,
        }
    }
}
