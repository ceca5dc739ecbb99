//! Route access control middleware
//!
//! Runs once per page request: reads the session cookies, evaluates the
//! [`AccessPolicy`] and either lets the request through with security
//! headers attached or answers with an uncacheable redirect.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Redirect as RedirectResponse, Response},
};
use metrics::counter;
use std::sync::Arc;

use crate::config::SecurityHeadersConfig;
use crate::identity::{extract_identity, CookieNames, Identity, RoleTag};
use crate::middleware::security_headers::{apply_security_headers, is_https};
use crate::policy::{AccessPolicy, Decision, Redirect};

/// Shared state for the access control middleware
#[derive(Clone)]
pub struct AccessState {
    policy: Arc<AccessPolicy>,
    cookies: Arc<CookieNames>,
    security_headers: Arc<SecurityHeadersConfig>,
}

impl AccessState {
    pub fn new(
        policy: AccessPolicy,
        cookies: CookieNames,
        security_headers: SecurityHeadersConfig,
    ) -> Self {
        Self {
            policy: Arc::new(policy),
            cookies: Arc::new(cookies),
            security_headers: Arc::new(security_headers),
        }
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }
}

impl Default for AccessState {
    fn default() -> Self {
        Self::new(
            AccessPolicy::default(),
            CookieNames::default(),
            SecurityHeadersConfig::default(),
        )
    }
}

/// Access control middleware
pub async fn access_control_middleware(
    State(state): State<AccessState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    // Assets and API calls are passed through untouched
    if state.policy.routes().is_excluded(request.uri().path()) {
        return next.run(request).await;
    }

    let identity = extract_identity(request.headers(), &state.cookies);
    if let Some(shown) = unrecognized_session_role(&identity) {
        tracing::warn!(role = %shown, "Unrecognized role cookie, denying role areas");
    }

    let path = request.uri().path();
    let evaluation = state
        .policy
        .evaluate(&identity, path, request.uri().query());

    let outcome = if evaluation.decision.is_allow() {
        "allow"
    } else {
        "redirect"
    };
    counter!(
        "barber_gate_access_decisions_total",
        "outcome" => outcome,
        "reason" => evaluation.rule.as_str()
    )
    .increment(1);

    match evaluation.decision {
        Decision::Allow => {
            let https = is_https(&request, &state.security_headers);
            let mut response = next.run(request).await;
            apply_security_headers(response.headers_mut(), &state.security_headers, https);
            response
        }
        Decision::Redirect(redirect) => {
            tracing::debug!(
                path = %path,
                rule = evaluation.rule.as_str(),
                target = %redirect.target,
                "Redirecting navigation"
            );
            redirect_response(&redirect)
        }
    }
}

/// Raw role tag of a signed-in session that carries an unknown role,
/// truncated for logging. Stale role cookies without a token are ignored.
fn unrecognized_session_role(identity: &Identity) -> Option<String> {
    match &identity.role {
        Some(RoleTag::Unrecognized(raw)) if identity.authenticated => {
            Some(raw.chars().take(32).collect())
        }
        _ => None,
    }
}

/// Materialize a redirect decision: `307` to the full location, never
/// cacheable, so a later request with different cookies cannot be served a
/// stale decision.
pub fn redirect_response(redirect: &Redirect) -> Response {
    let mut response = RedirectResponse::temporary(&redirect.location()).into_response();
    let headers = response.headers_mut();

    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-store, no-cache, must-revalidate, proxy-revalidate"),
    );
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::EXPIRES, HeaderValue::from_static("0"));

    response
}
