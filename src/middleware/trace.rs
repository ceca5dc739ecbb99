//! TraceLayer span maker that keeps navigation parameters out of logs.
//!
//! Return paths and flash messages travel in the query string. They can
//! contain user-typed text and deep links, so their values are redacted in
//! the logged URI.

use axum::http::{Request, Uri};
use tower_http::trace::MakeSpan;
use tracing::Span;

use crate::flash::{MESSAGE_PARAM, TYPE_PARAM};
use crate::policy::RETURN_PARAM;

/// Query parameter names whose values are redacted.
const REDACTED_PARAMS: &[&str] = &[RETURN_PARAM, MESSAGE_PARAM, "token", "auth_token"];

#[derive(Clone, Debug)]
pub struct SanitizedMakeSpan;

impl<B> MakeSpan<B> for SanitizedMakeSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        tracing::info_span!(
            "http",
            method = %request.method(),
            uri = %sanitize_uri(request.uri()),
            version = ?request.version(),
        )
    }
}

fn sanitize_uri(uri: &Uri) -> String {
    let Some(query) = uri.query() else {
        return uri.path().to_string();
    };

    let pairs: Vec<String> = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((key, _)) if is_redacted(key) => format!("{key}=[REDACTED]"),
            _ => pair.to_string(),
        })
        .collect();

    format!("{}?{}", uri.path(), pairs.join("&"))
}

fn is_redacted(key: &str) -> bool {
    // severity is harmless and useful when reading logs
    if key.eq_ignore_ascii_case(TYPE_PARAM) {
        return false;
    }
    REDACTED_PARAMS.iter().any(|p| key.eq_ignore_ascii_case(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_without_query() {
        let uri: Uri = "/booking".parse().unwrap();
        assert_eq!(sanitize_uri(&uri), "/booking");
    }

    #[test]
    fn test_navigation_params_redacted() {
        let uri: Uri = "/login?redirect=%2Fadmin%2Fusers&message=Please%20log%20in&type=info"
            .parse()
            .unwrap();
        assert_eq!(
            sanitize_uri(&uri),
            "/login?redirect=[REDACTED]&message=[REDACTED]&type=info"
        );
    }

    #[test]
    fn test_other_params_kept() {
        let uri: Uri = "/booking?date=2024-05-01&Message=x&flag".parse().unwrap();
        assert_eq!(
            sanitize_uri(&uri),
            "/booking?date=2024-05-01&Message=[REDACTED]&flag"
        );
    }
}
