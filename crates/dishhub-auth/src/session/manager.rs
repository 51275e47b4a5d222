//! Session manager: the single owner of the signed-in user state.
//!
//! Every flow runs under one lock, so at most one authentication flow is in
//! flight per manager. State changes are published on a `watch` channel;
//! readers subscribe instead of polling.

use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};

use dishhub_core::error::PlatformError;
use dishhub_core::result::AppResult;
use dishhub_core::traits::account::{AccountService, SessionTarget};
use dishhub_core::types::id::UserId;
use dishhub_entity::user::User;

use crate::credentials::{SignInForm, SignUpForm};
use crate::errors::auth_error;
use crate::retry::RetryPolicy;

use super::state::{AuthSnapshot, SessionState};

/// Owns the authentication state machine for one client instance.
#[derive(Debug)]
pub struct SessionManager {
    account: Arc<dyn AccountService>,
    signup_retry: RetryPolicy,
    state: watch::Sender<SessionState>,
    flow: Mutex<()>,
}

impl SessionManager {
    /// Create a manager in the `Pending` state. Call
    /// [`SessionManager::initialize`] to resolve it.
    pub fn new(account: Arc<dyn AccountService>, signup_retry: RetryPolicy) -> Self {
        let (state, _) = watch::channel(SessionState::Pending);
        Self {
            account,
            signup_retry,
            state,
            flow: Mutex::new(()),
        }
    }

    /// Receive every state change from now on.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn snapshot(&self) -> AuthSnapshot {
        self.state.borrow().snapshot()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.borrow().user().cloned()
    }

    /// Wait until no flow is in flight and return the settled state.
    pub async fn resolved(&self) -> SessionState {
        let mut rx = self.state.subscribe();
        let settled = match rx.wait_for(|state| !state.is_pending()).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        };
        settled
    }

    fn transition(&self, next: SessionState) {
        let previous = self.state.send_replace(next);
        debug!(
            from = previous.label(),
            to = self.state.borrow().label(),
            "Session state changed"
        );
    }

    /// Startup check: resolve the initial `Pending` state.
    pub async fn initialize(&self) -> SessionState {
        let _flow = self.flow.lock().await;
        self.transition(SessionState::Pending);
        if let Err(e) = self.load_current().await {
            warn!(error = %e, "Startup session check failed");
        }
        self.state()
    }

    /// Ask the platform who is signed in.
    ///
    /// Does not pass through `Pending`. Any failure leaves the client
    /// anonymous; only failures other than an authentication refusal are
    /// returned.
    pub async fn refresh(&self) -> AppResult<Option<User>> {
        let _flow = self.flow.lock().await;
        self.load_current().await
    }

    async fn load_current(&self) -> AppResult<Option<User>> {
        match self.account.current_account().await {
            Ok(record) => {
                let user = User::from(record);
                self.transition(SessionState::Authenticated(user.clone()));
                Ok(Some(user))
            }
            Err(PlatformError::Api { code: 401 | 404, .. }) => {
                self.transition(SessionState::Anonymous);
                Ok(None)
            }
            Err(e) => {
                self.transition(SessionState::Anonymous);
                Err(auth_error("Failed to load current user", e))
            }
        }
    }

    /// Sign in with email and password.
    ///
    /// `Pending` while in flight, then `Authenticated` or `Anonymous`.
    pub async fn sign_in(&self, email: &str, password: &str) -> AppResult<User> {
        let form = SignInForm::new(email, password);
        form.check()?;

        let _flow = self.flow.lock().await;
        self.transition(SessionState::Pending);
        match self.open_session(&form.email, &form.password).await {
            Ok(user) => Ok(user),
            Err(e) => {
                self.transition(SessionState::Anonymous);
                Err(e)
            }
        }
    }

    /// Create an account, then sign in to it.
    ///
    /// Account creation is retried per the injected policy for retryable
    /// failures only. On failure the state returns to what it was before.
    pub async fn sign_up(&self, form: &SignUpForm) -> AppResult<User> {
        form.check()?;

        let _flow = self.flow.lock().await;
        let prior = self.state();
        self.transition(SessionState::Pending);

        let user_id = UserId::unique();
        let created = self
            .signup_retry
            .run(
                || {
                    self.account
                        .create_account(&user_id, &form.email, &form.password, &form.name)
                },
                PlatformError::is_retryable,
            )
            .await;
        if let Err(e) = created {
            self.transition(prior);
            return Err(auth_error("Account creation failed", e));
        }
        info!(user_id = %user_id, "Account created");

        match self.open_session(&form.email, &form.password).await {
            Ok(user) => Ok(user),
            Err(e) => {
                self.transition(prior);
                Err(e)
            }
        }
    }

    async fn open_session(&self, email: &str, password: &str) -> AppResult<User> {
        self.account
            .create_email_session(email, password)
            .await
            .map_err(|e| auth_error("Sign-in failed", e))?;
        let record = self
            .account
            .current_account()
            .await
            .map_err(|e| auth_error("Failed to load signed-in user", e))?;

        let user = User::from(record);
        info!(user_id = %user.id, "Signed in");
        self.transition(SessionState::Authenticated(user.clone()));
        Ok(user)
    }

    /// Sign out.
    ///
    /// Local state becomes `Anonymous` whether or not the platform accepted
    /// the session deletion; a remote failure is still returned.
    pub async fn sign_out(&self) -> AppResult<()> {
        let _flow = self.flow.lock().await;
        self.transition(SessionState::Pending);
        let result = self.account.delete_session(SessionTarget::Current).await;
        self.transition(SessionState::Anonymous);

        match result {
            Ok(()) => {
                info!("Signed out");
                Ok(())
            }
            Err(e) => Err(auth_error("Sign-out failed", e)),
        }
    }

    /// Credential of the held session, for persisting between runs.
    pub fn export_session(&self) -> Option<String> {
        self.account.export_session()
    }

    /// Restore a persisted credential. Call [`SessionManager::initialize`]
    /// afterwards to learn whether it is still valid.
    pub fn import_session(&self, credential: String) {
        self.account.import_session(credential);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use dishhub_core::error::ErrorKind;
    use dishhub_platform::memory::{MemoryPlatform, PlatformOp};

    fn setup() -> (MemoryPlatform, SessionManager) {
        let platform = MemoryPlatform::new("memory://dishhub", "proj");
        let manager = SessionManager::new(
            platform.account.clone(),
            RetryPolicy::fixed(3, Duration::from_millis(500)),
        );
        (platform, manager)
    }

    fn form() -> SignUpForm {
        SignUpForm::new("Ana", "ana@example.com", "password1", "password1")
    }

    #[tokio::test]
    async fn test_starts_pending_and_resolves_anonymous() {
        let (_platform, manager) = setup();
        assert_eq!(manager.state(), SessionState::Pending);
        assert!(manager.snapshot().loading);

        assert_eq!(manager.initialize().await, SessionState::Anonymous);
        assert_eq!(
            manager.snapshot(),
            AuthSnapshot {
                is_authenticated: false,
                loading: false
            }
        );
    }

    #[tokio::test]
    async fn test_sign_up_signs_in() {
        let (_platform, manager) = setup();
        manager.initialize().await;

        let user = manager.sign_up(&form()).await.expect("sign up");
        assert_eq!(user.display_name(), "Ana");
        assert!(manager.snapshot().is_authenticated);
    }

    #[tokio::test]
    async fn test_invalid_form_makes_no_call() {
        let (platform, manager) = setup();
        manager.initialize().await;

        let bad = SignUpForm::new("Ana", "ana@example.com", "password1", "password2");
        let err = manager.sign_up(&bad).await.expect_err("invalid");
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(platform.faults.call_count(PlatformOp::CreateAccount), 0);
        assert_eq!(manager.state(), SessionState::Anonymous);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sign_up_retries_transient_failures() {
        let (platform, manager) = setup();
        manager.initialize().await;
        platform.faults.fail_times(
            PlatformOp::CreateAccount,
            2,
            PlatformError::api(503, "general_service_disabled", "unavailable"),
        );

        manager.sign_up(&form()).await.expect("sign up");
        assert_eq!(platform.faults.call_count(PlatformOp::CreateAccount), 3);
    }

    #[tokio::test]
    async fn test_duplicate_account_is_not_retried() {
        let (platform, manager) = setup();
        manager.initialize().await;
        manager.sign_up(&form()).await.expect("first sign up");
        manager.sign_out().await.expect("sign out");

        let err = manager.sign_up(&form()).await.expect_err("duplicate");
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert_eq!(err.message, "An account with this email already exists.");
        assert_eq!(platform.faults.call_count(PlatformOp::CreateAccount), 2);
        assert_eq!(manager.state(), SessionState::Anonymous);
    }

    #[tokio::test]
    async fn test_sign_out_clears_state_even_when_remote_fails() {
        let (platform, manager) = setup();
        manager.initialize().await;
        manager.sign_up(&form()).await.expect("sign up");

        platform.faults.fail_next(
            PlatformOp::DeleteSession,
            PlatformError::Network("offline".into()),
        );
        let err = manager.sign_out().await.expect_err("remote failure");
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert_eq!(manager.state(), SessionState::Anonymous);
    }

    #[tokio::test]
    async fn test_refresh_detects_revoked_session() {
        let (platform, manager) = setup();
        manager.initialize().await;
        manager.sign_up(&form()).await.expect("sign up");

        platform.account.revoke_all_sessions();
        assert_eq!(manager.refresh().await.expect("refresh"), None);
        assert_eq!(manager.state(), SessionState::Anonymous);
    }

    #[tokio::test]
    async fn test_startup_network_failure_resolves_anonymous() {
        let (platform, manager) = setup();
        platform.faults.fail_next(
            PlatformOp::GetAccount,
            PlatformError::Network("offline".into()),
        );
        assert_eq!(manager.initialize().await, SessionState::Anonymous);
    }
}
