//! Integration tests for routing behind the session guard.

mod helpers;

use std::time::Duration;

use dishhub_core::config::AppConfig;
use dishhub_core::error::ErrorKind;
use dishhub_platform::PlatformOp;
use dishhub_web::{GuardDecision, GuardedRouter, Route};

use helpers::TestApp;

#[tokio::test]
async fn test_upload_redirects_until_signed_in() {
    let app = TestApp::new().await;
    let router = GuardedRouter::new(app.session.clone()).expect("router");

    assert_eq!(
        router.navigate("/upload"),
        GuardDecision::Redirect("/login".to_string())
    );
    assert_eq!(
        router.navigate("/profile"),
        GuardDecision::Redirect("/login".to_string())
    );
    assert_eq!(router.navigate("/explore"), GuardDecision::Render(Route::Explore));

    app.sign_up("Ana", "ana@example.com").await;
    app.session.sign_out().await.expect("sign out");
    assert_eq!(
        router.navigate("/upload"),
        GuardDecision::Redirect("/login".to_string())
    );

    app.session
        .sign_in("ana@example.com", "password1")
        .await
        .expect("sign in");
    assert_eq!(router.navigate("/upload"), GuardDecision::Render(Route::Upload));
    assert_eq!(router.navigate("/profile"), GuardDecision::Render(Route::Profile));

    app.session.sign_out().await.expect("sign out");
    assert_eq!(
        router.navigate("/upload"),
        GuardDecision::Redirect("/login".to_string())
    );
}

#[tokio::test(start_paused = true)]
async fn test_protected_route_waits_for_startup_check() {
    let app = TestApp::unresolved();
    app.memory
        .faults
        .set_latency(PlatformOp::GetAccount, Duration::from_millis(100));
    let router = GuardedRouter::new(app.session.clone()).expect("router");

    assert_eq!(router.navigate("/upload"), GuardDecision::Wait);
    assert_eq!(router.navigate("/"), GuardDecision::Render(Route::Home));

    let session = app.session.clone();
    let startup = tokio::spawn(async move { session.initialize().await });
    assert_eq!(
        router.navigate_resolved("/upload").await,
        GuardDecision::Redirect("/login".to_string())
    );
    startup.await.expect("startup");
}

#[tokio::test]
async fn test_dish_detail_and_unknown_paths() {
    let app = TestApp::new().await;
    let router = GuardedRouter::new(app.session.clone()).expect("router");

    match router.navigate("/dish/65f1c2a0abc") {
        GuardDecision::Render(Route::DishDetail(id)) => assert_eq!(id.as_str(), "65f1c2a0abc"),
        other => panic!("unexpected decision: {other:?}"),
    }
    assert_eq!(
        router.navigate("/no/such/page"),
        GuardDecision::Redirect("/".to_string())
    );
}

#[test]
fn test_missing_configuration_lists_every_key() {
    let err = AppConfig::default().validate().expect_err("nothing configured");
    assert_eq!(err.kind, ErrorKind::Configuration);
    for var in [
        "DISHHUB_PLATFORM__PROJECT_ID",
        "DISHHUB_PLATFORM__DATABASE_ID",
        "DISHHUB_PLATFORM__COLLECTION_ID",
        "DISHHUB_PLATFORM__BUCKET_ID",
    ] {
        assert!(err.message.contains(var), "{var} missing from: {}", err.message);
    }
}
