//! Path hygiene guard
//!
//! The access policy matches route prefixes on the raw request path, so a
//! path like `/booking/../admin` would be classified as customer area while
//! resolving to the admin area. Requests with dot segments (plain or
//! percent-encoded) or empty segments are rejected before classification.

use axum::{body::Body, http::Request, middleware::Next, response::Response};

use crate::error::AppError;

/// Returns `true` if any path segment is `.` or `..`, decoded or not.
fn has_dot_segments(path: &str) -> bool {
    path.split('/').any(|seg| {
        let decoded = urlencoding::decode(seg)
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| seg.to_string());
        decoded == "." || decoded == ".."
    })
}

/// Returns `true` for `//` anywhere in the path.
fn has_empty_segments(path: &str) -> bool {
    path.contains("//")
}

/// Middleware that rejects ambiguous paths with `400 Bad Request`.
pub async fn path_guard_middleware(
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path();
    if has_dot_segments(path) || has_empty_segments(path) {
        tracing::debug!(path = %path, "Rejecting ambiguous path");
        return Err(AppError::BadRequest("Invalid request path".to_string()));
    }
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, Router};
    use tower::ServiceExt;

    #[test]
    fn test_has_dot_segments() {
        assert!(has_dot_segments("/booking/../admin"));
        assert!(has_dot_segments("/booking/./confirm"));
        assert!(has_dot_segments("/booking/%2e%2e/admin"));
        assert!(has_dot_segments("/booking/%2E/admin"));
        assert!(!has_dot_segments("/booking/confirm"));
        assert!(!has_dot_segments("/galeri/photo.jpg")); // dots within segment are fine
    }

    #[test]
    fn test_has_empty_segments() {
        assert!(has_empty_segments("//admin"));
        assert!(has_empty_segments("/booking//x"));
        assert!(!has_empty_segments("/booking/"));
    }

    #[tokio::test]
    async fn test_guard_rejects_traversal() {
        let app = Router::new()
            .fallback(|| async { "page" })
            .layer(axum::middleware::from_fn(path_guard_middleware));

        let request = Request::builder()
            .uri("/booking/%2e%2e/admin")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let request = Request::builder()
            .uri("/booking")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
