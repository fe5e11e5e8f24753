//! Newsletter popup scheduling and dismissal.

use athyre_integration_tests::TestApp;
use athyre_storefront::preferences::POPUP_DISMISSED_COOKIE;
use axum::http::StatusCode;

const POPUP_MARKER: &str = "id=\"newsletter-popup\"";
const POPUP_SLOT: &str = "id=\"newsletter-popup-slot\"";

#[tokio::test]
async fn test_home_schedules_popup_after_delay() {
    let mut app = TestApp::new();

    let home = app.get("/").await;
    assert!(home.body.contains(POPUP_SLOT));
    assert!(home.body.contains("hx-trigger=\"load delay:4s\""));
    // Not rendered until the delayed fetch
    assert!(!home.body.contains(POPUP_MARKER));

    let popup = app.get("/popup").await;
    assert_eq!(popup.status, StatusCode::OK);
    assert!(popup.body.contains(POPUP_MARKER));
    assert!(popup.body.contains("GET 10% OFF"));
}

#[tokio::test]
async fn test_popup_shown_until_dismissed() {
    let mut app = TestApp::new();

    assert!(app.get("/popup").await.body.contains(POPUP_MARKER));

    let dismissed = app.post_form("/popup/dismiss", "").await;
    assert_eq!(dismissed.status, StatusCode::NO_CONTENT);
    assert!(app.has_cookie(POPUP_DISMISSED_COOKIE));

    let home = app.get("/").await;
    assert!(!home.body.contains(POPUP_SLOT));

    let popup = app.get("/popup").await;
    assert_eq!(popup.status, StatusCode::OK);
    assert!(popup.body.trim().is_empty());
}

#[tokio::test]
async fn test_dismissal_is_idempotent_and_per_visitor() {
    let mut alice = TestApp::new();
    let mut bob = alice.new_visitor();

    alice.post_form("/popup/dismiss", "").await;
    let again = alice.post_form("/popup/dismiss", "").await;
    assert_eq!(again.status, StatusCode::NO_CONTENT);
    assert!(!alice.get("/").await.body.contains(POPUP_SLOT));

    assert!(bob.get("/").await.body.contains(POPUP_SLOT));
    assert!(bob.get("/popup").await.body.contains(POPUP_MARKER));
}
