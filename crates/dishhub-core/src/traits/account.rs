//! Account and session capability of the hosted platform.

use async_trait::async_trait;

use crate::result::PlatformResult;
use crate::types::id::{SessionId, UserId};
use crate::types::record::{AccountRecord, SessionRecord};

/// Which session to delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionTarget {
    /// The session this client is currently using.
    Current,
    /// A specific session.
    Id(SessionId),
}

impl SessionTarget {
    /// Path segment the platform expects for this target.
    pub fn as_path_segment(&self) -> &str {
        match self {
            Self::Current => "current",
            Self::Id(id) => id.as_str(),
        }
    }
}

/// Account management and session credentials.
///
/// A handle carries at most one active session; every call after
/// [`AccountService::create_email_session`] is made on behalf of that
/// session.
#[async_trait]
pub trait AccountService: Send + Sync + std::fmt::Debug + 'static {
    /// Register a new account.
    async fn create_account(
        &self,
        user_id: &UserId,
        email: &str,
        password: &str,
        name: &str,
    ) -> PlatformResult<AccountRecord>;

    /// Exchange email and password for a session credential.
    async fn create_email_session(&self, email: &str, password: &str)
    -> PlatformResult<SessionRecord>;

    /// Fetch the account owning the current session.
    async fn current_account(&self) -> PlatformResult<AccountRecord>;

    /// Delete a session; deleting [`SessionTarget::Current`] drops the
    /// credential held by this handle.
    async fn delete_session(&self, target: SessionTarget) -> PlatformResult<()>;

    /// Serialized form of the held session credential, if any.
    fn export_session(&self) -> Option<String>;

    /// Adopt a previously exported session credential.
    fn import_session(&self, credential: String);
}
