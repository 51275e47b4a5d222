//! In-memory account and session service.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use dishhub_core::error::PlatformError;
use dishhub_core::result::PlatformResult;
use dishhub_core::traits::account::{AccountService, SessionTarget};
use dishhub_core::types::id::{SessionId, UserId};
use dishhub_core::types::record::{AccountRecord, SessionRecord};

use super::faults::{FaultInjector, PlatformOp};

/// Shortest password the platform accepts.
const MIN_PASSWORD_LEN: usize = 8;

/// Days until a new session expires.
const SESSION_LIFETIME_DAYS: i64 = 365;

#[derive(Debug, Clone)]
struct StoredAccount {
    record: AccountRecord,
    password: String,
}

/// Accounts and sessions held in process memory.
///
/// Like a client of the hosted platform, the service holds at most one
/// current session credential.
#[derive(Debug)]
pub struct MemoryAccountService {
    accounts: DashMap<UserId, StoredAccount>,
    sessions: DashMap<SessionId, UserId>,
    current: RwLock<Option<SessionId>>,
    faults: Arc<FaultInjector>,
}

impl MemoryAccountService {
    /// Create an empty service sharing the given fault injector.
    pub fn new(faults: Arc<FaultInjector>) -> Self {
        Self {
            accounts: DashMap::new(),
            sessions: DashMap::new(),
            current: RwLock::new(None),
            faults,
        }
    }

    /// Invalidate every session on the server side, leaving the held
    /// credential in place.
    pub fn revoke_all_sessions(&self) {
        self.sessions.clear();
    }

    /// Number of live server-side sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Number of registered accounts.
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    fn current_session(&self) -> Option<SessionId> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn set_current(&self, session: Option<SessionId>) {
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = session;
    }

    fn find_by_email(&self, email: &str) -> Option<StoredAccount> {
        self.accounts
            .iter()
            .find(|entry| entry.record.email.eq_ignore_ascii_case(email))
            .map(|entry| entry.value().clone())
    }

    fn unauthorized() -> PlatformError {
        PlatformError::api(
            401,
            "general_unauthorized_scope",
            "User (role: guests) missing scope (account)",
        )
    }
}

#[async_trait]
impl AccountService for MemoryAccountService {
    async fn create_account(
        &self,
        user_id: &UserId,
        email: &str,
        password: &str,
        name: &str,
    ) -> PlatformResult<AccountRecord> {
        self.faults.enter(PlatformOp::CreateAccount).await?;

        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(PlatformError::api(
                400,
                "general_argument_invalid",
                "Invalid `password` param: Password must be at least 8 characters",
            ));
        }
        if self.accounts.contains_key(user_id) || self.find_by_email(email).is_some() {
            return Err(PlatformError::api(
                409,
                "user_already_exists",
                "A user with the same id, email, or phone already exists in this project.",
            ));
        }

        let record = AccountRecord {
            id: user_id.clone(),
            name: name.to_string(),
            email: email.to_string(),
            created_at: Utc::now(),
        };
        self.accounts.insert(
            user_id.clone(),
            StoredAccount {
                record: record.clone(),
                password: password.to_string(),
            },
        );
        Ok(record)
    }

    async fn create_email_session(
        &self,
        email: &str,
        password: &str,
    ) -> PlatformResult<SessionRecord> {
        self.faults.enter(PlatformOp::CreateSession).await?;

        let active = self
            .current_session()
            .is_some_and(|current| self.sessions.contains_key(&current));
        if active {
            return Err(PlatformError::api(
                401,
                "user_session_already_exists",
                "Creation of a session is prohibited when a session is active.",
            ));
        }

        let account = self
            .find_by_email(email)
            .filter(|account| account.password == password)
            .ok_or_else(|| {
                PlatformError::api(
                    401,
                    "user_invalid_credentials",
                    "Invalid credentials. Please check the email and password.",
                )
            })?;

        let session = SessionRecord {
            id: SessionId::unique(),
            user_id: account.record.id.clone(),
            expire: Utc::now() + chrono::Duration::days(SESSION_LIFETIME_DAYS),
        };
        self.sessions
            .insert(session.id.clone(), session.user_id.clone());
        self.set_current(Some(session.id.clone()));
        Ok(session)
    }

    async fn current_account(&self) -> PlatformResult<AccountRecord> {
        self.faults.enter(PlatformOp::GetAccount).await?;

        let session = self.current_session().ok_or_else(Self::unauthorized)?;
        let user_id = self
            .sessions
            .get(&session)
            .map(|entry| entry.value().clone())
            .ok_or_else(Self::unauthorized)?;
        self.accounts
            .get(&user_id)
            .map(|entry| entry.record.clone())
            .ok_or_else(Self::unauthorized)
    }

    async fn delete_session(&self, target: SessionTarget) -> PlatformResult<()> {
        self.faults.enter(PlatformOp::DeleteSession).await?;

        let current = self.current_session();
        let session = match target {
            SessionTarget::Current => current.clone().ok_or_else(Self::unauthorized)?,
            SessionTarget::Id(id) => id,
        };

        let removed = self.sessions.remove(&session).is_some();
        if current.as_ref() == Some(&session) {
            self.set_current(None);
        }
        if removed {
            Ok(())
        } else {
            Err(PlatformError::api(
                404,
                "user_session_not_found",
                "The current user session could not be found.",
            ))
        }
    }

    fn export_session(&self) -> Option<String> {
        self.current_session().map(SessionId::into_inner)
    }

    fn import_session(&self, credential: String) {
        self.set_current(Some(SessionId::from_raw(credential)));
    }
}
