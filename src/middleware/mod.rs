//! HTTP middleware for the gateway
//!
//! - Route access control (session cookies, role areas, redirects)
//! - Security headers for allowed responses
//! - Path hygiene guard
//! - Request ID propagation and HTTP metrics
//! - Log-safe request spans

pub mod access;
pub mod metrics;
pub mod path_guard;
pub mod security_headers;
pub mod trace;

pub use access::{access_control_middleware, redirect_response, AccessState};
pub use metrics::ObservabilityLayer;
pub use path_guard::path_guard_middleware;
pub use security_headers::apply_security_headers;
pub use trace::SanitizedMakeSpan;
