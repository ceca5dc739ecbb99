//! Health and metrics endpoints

mod common;

use axum::http::StatusCode;
use common::{body_text, get, test_app};

#[tokio::test]
async fn test_health_is_outside_the_gate() {
    let (app, _dir) = test_app();

    let response = get(&app, "/health", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("X-Frame-Options").is_none());
    assert!(response.headers().get("x-request-id").is_some());
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn test_metrics_not_enabled() {
    let (app, _dir) = test_app();

    let response = get(&app, "/metrics", None).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(response).await, "Metrics not enabled");
}
