//! Common test utilities
#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use barber_gate::config::{Config, SecurityHeadersConfig, TelemetryConfig};
use barber_gate::identity::CookieNames;
use barber_gate::server::build_router;
use barber_gate::state::AppState;
use tempfile::TempDir;
use tower::ServiceExt;

pub const INDEX_HTML: &str = "<!doctype html><div id=\"root\"></div>";
pub const APP_JS: &str = "console.log('app')";

/// Router over a throwaway frontend bundle. Keep the `TempDir` alive for
/// as long as the router is used.
pub fn test_app() -> (Router, TempDir) {
    test_app_with(SecurityHeadersConfig::default())
}

pub fn test_app_with(security_headers: SecurityHeadersConfig) -> (Router, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), INDEX_HTML).unwrap();
    std::fs::create_dir_all(dir.path().join("_next/static")).unwrap();
    std::fs::write(dir.path().join("_next/static/app.js"), APP_JS).unwrap();
    std::fs::write(dir.path().join("favicon.ico"), [0u8, 0, 1, 0]).unwrap();

    let config = Config {
        http_host: "127.0.0.1".to_string(),
        http_port: 0,
        frontend_dir: dir.path().to_path_buf(),
        cookies: CookieNames::default(),
        security_headers,
        telemetry: TelemetryConfig {
            metrics_enabled: false,
            ..TelemetryConfig::default()
        },
    };

    (build_router(AppState::new(config, None)), dir)
}

/// GET `path`, optionally with a raw `Cookie` header.
pub async fn get(app: &Router, path: &str, cookie: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(path);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = builder.body(Body::empty()).unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub fn location(response: &Response<Body>) -> String {
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    response
        .headers()
        .get(header::LOCATION)
        .expect("redirect without Location")
        .to_str()
        .unwrap()
        .to_string()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap_or_default();
    String::from_utf8_lossy(&bytes).into_owned()
}

pub fn session(role: &str) -> String {
    format!("auth_token=test-token; user_role={}", role)
}
