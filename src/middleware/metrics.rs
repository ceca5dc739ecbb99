//! HTTP observability middleware
//!
//! Implemented as a Tower Layer/Service so it wraps the whole router,
//! including redirects produced by the access gate. Combines request ID
//! propagation and metrics recording.

use axum::{body::Body, http::Request, response::Response};
use metrics::{counter, gauge, histogram};
use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
    time::Instant,
};
use tower::{Layer, Service};
use tracing::Instrument;
use uuid::Uuid;

use crate::routes::{RoleArea, RouteTable};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Tower Layer for HTTP observability (request ID + metrics).
#[derive(Clone)]
pub struct ObservabilityLayer {
    routes: Arc<RouteTable>,
}

impl ObservabilityLayer {
    pub fn new(routes: RouteTable) -> Self {
        Self {
            routes: Arc::new(routes),
        }
    }
}

impl<S> Layer<S> for ObservabilityLayer {
    type Service = ObservabilityMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ObservabilityMiddleware {
            inner,
            routes: self.routes.clone(),
        }
    }
}

/// Tower Service that records HTTP metrics and propagates request IDs.
#[derive(Clone)]
pub struct ObservabilityMiddleware<S> {
    inner: S,
    routes: Arc<RouteTable>,
}

impl<S> Service<Request<Body>> for ObservabilityMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let method = request.method().to_string();
        let area = area_label(&self.routes, request.uri().path());

        let request_id = request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let in_flight = InFlightGuard::new();
        let start = Instant::now();

        // Take the service that was driven to readiness, leave a fresh clone behind
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let span = tracing::info_span!("request", request_id = %request_id);

        Box::pin(
            async move {
                let result = inner.call(request).await;
                drop(in_flight);
                let mut response = result?;

                let duration = start.elapsed().as_secs_f64();
                let status = response.status().as_u16().to_string();

                counter!(
                    "barber_gate_http_requests_total",
                    "method" => method.clone(),
                    "area" => area,
                    "status" => status
                )
                .increment(1);
                histogram!(
                    "barber_gate_http_request_duration_seconds",
                    "method" => method,
                    "area" => area
                )
                .record(duration);

                if let Ok(val) = request_id.parse() {
                    response.headers_mut().insert(REQUEST_ID_HEADER, val);
                }

                Ok(response)
            }
            .instrument(span),
        )
    }
}

/// Counts a request as in flight until dropped, so a cancelled request
/// future still gives its slot back.
struct InFlightGuard;

impl InFlightGuard {
    fn new() -> Self {
        gauge!("barber_gate_http_requests_in_flight").increment(1.0);
        Self
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        gauge!("barber_gate_http_requests_in_flight").decrement(1.0);
    }
}

/// Bounded label for a request path. Raw paths would make label cardinality
/// depend on whatever clients send.
fn area_label(routes: &RouteTable, path: &str) -> &'static str {
    if routes.is_excluded(path) {
        return "excluded";
    }
    match routes.role_area_of(path) {
        RoleArea::None if routes.is_public(path) => "public",
        RoleArea::None => "other",
        area => area.as_str(),
    }
}
