//! Security headers for responses that pass the access check
//!
//! Every allowed page response gets framing, MIME-sniffing and referrer
//! restrictions. HSTS is optional and only emitted for HTTPS requests.

use axum::http::{header, HeaderMap, HeaderValue, Request};

use crate::config::SecurityHeadersConfig;

/// Whether the request reached us over HTTPS, directly or via a trusted proxy
pub fn is_https<B>(request: &Request<B>, config: &SecurityHeadersConfig) -> bool {
    if request.uri().scheme_str() == Some("https") {
        return true;
    }
    config.hsts_trust_x_forwarded_proto
        && request
            .headers()
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.eq_ignore_ascii_case("https"))
            .unwrap_or(false)
}

fn hsts_value(config: &SecurityHeadersConfig) -> Option<HeaderValue> {
    let mut value = format!("max-age={}", config.hsts_max_age_secs);
    if config.hsts_include_subdomains {
        value.push_str("; includeSubDomains");
    }
    if config.hsts_preload {
        value.push_str("; preload");
    }
    HeaderValue::from_str(&value).ok()
}

/// Attach the pass-through security headers to `headers`.
pub fn apply_security_headers(headers: &mut HeaderMap, config: &SecurityHeadersConfig, https: bool) {
    // Prevent clickjacking
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));

    // Prevent MIME type sniffing
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );

    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    // Never send HSTS over plain HTTP unless explicitly told to
    let should_add_hsts = config.hsts_enabled && (https || !config.hsts_https_only);
    if should_add_hsts {
        if let Some(value) = hsts_value(config) {
            headers.insert(header::STRICT_TRANSPORT_SECURITY, value);
        }
    }
}
