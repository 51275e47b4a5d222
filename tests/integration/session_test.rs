//! Integration tests for the session state machine.

mod helpers;

use std::time::Duration;

use dishhub_auth::SessionState;
use dishhub_core::error::{ErrorKind, PlatformError};
use dishhub_platform::PlatformOp;

use helpers::TestApp;

#[tokio::test(start_paused = true)]
async fn test_sign_in_passes_through_pending() {
    let app = TestApp::new().await;
    app.sign_up("Ana", "ana@example.com").await;
    app.session.sign_out().await.expect("sign out");
    assert_eq!(app.session.state(), SessionState::Anonymous);

    app.memory
        .faults
        .set_latency(PlatformOp::CreateSession, Duration::from_millis(100));
    let mut rx = app.session.subscribe();
    let _ = rx.borrow_and_update();

    let session = app.session.clone();
    let task = tokio::spawn(async move { session.sign_in("ana@example.com", "password1").await });

    rx.changed().await.expect("state change");
    assert!(rx.borrow_and_update().is_pending());
    assert!(app.session.snapshot().loading);

    rx.changed().await.expect("state change");
    let state = rx.borrow_and_update().clone();
    let user = state.user().expect("signed in");
    assert_eq!(user.display_name(), "Ana");

    let signed_in = task.await.expect("join").expect("sign in");
    assert_eq!(signed_in.email, "ana@example.com");
}

#[tokio::test(start_paused = true)]
async fn test_wrong_password_returns_to_anonymous() {
    let app = TestApp::new().await;
    app.sign_up("Ana", "ana@example.com").await;
    app.session.sign_out().await.expect("sign out");
    assert_eq!(app.session.state(), SessionState::Anonymous);

    app.memory
        .faults
        .set_latency(PlatformOp::CreateSession, Duration::from_millis(100));
    let mut rx = app.session.subscribe();
    let _ = rx.borrow_and_update();

    let session = app.session.clone();
    let task =
        tokio::spawn(async move { session.sign_in("ana@example.com", "wrong-password").await });

    rx.changed().await.expect("state change");
    assert!(rx.borrow_and_update().is_pending());

    rx.changed().await.expect("state change");
    assert_eq!(*rx.borrow_and_update(), SessionState::Anonymous);

    let err = task.await.expect("join").expect_err("bad credentials");
    assert_eq!(err.kind, ErrorKind::Authentication);
    assert_eq!(err.message, "Invalid email or password.");
    assert_eq!(app.session.state(), SessionState::Anonymous);
}

#[tokio::test]
async fn test_duplicate_sign_up_keeps_prior_state() {
    let app = TestApp::new().await;
    app.sign_up("Ana", "ana@example.com").await;
    app.session.sign_out().await.expect("sign out");

    let err = app
        .session
        .sign_up(&dishhub_auth::SignUpForm::new(
            "Ana again",
            "ANA@example.com",
            "password1",
            "password1",
        ))
        .await
        .expect_err("duplicate email");

    assert_eq!(err.kind, ErrorKind::Authentication);
    assert_eq!(err.message, "An account with this email already exists.");
    assert_eq!(app.session.state(), SessionState::Anonymous);
    assert_eq!(app.memory.account.account_count(), 1);
}

#[tokio::test]
async fn test_startup_check_restores_existing_session() {
    let app = TestApp::new().await;
    app.sign_up("Ana", "ana@example.com").await;
    let credential = app.session.export_session().expect("credential");

    let fresh = dishhub_auth::SessionManager::new(
        app.platform.account(),
        dishhub_auth::RetryPolicy::none(),
    );
    assert!(fresh.state().is_pending());
    fresh.import_session(credential);

    let state = fresh.initialize().await;
    assert_eq!(state.user().map(|u| u.email.as_str()), Some("ana@example.com"));
}

#[tokio::test]
async fn test_unreachable_platform_resolves_anonymous() {
    let app = TestApp::unresolved();
    app.memory.faults.fail_next(
        PlatformOp::GetAccount,
        PlatformError::Network("dns failure".into()),
    );

    let state = app.session.initialize().await;
    assert_eq!(state, SessionState::Anonymous);
    assert!(!app.session.snapshot().loading);
}
