//! Barber Gate - route access control for the barbershop booking frontend
//!
//! Every page navigation passes through a cookie-based access policy that
//! decides, per role, whether the page is served or the visitor is redirected
//! (to sign in, or back to their own dashboard) with a one-shot message.

pub mod api;
pub mod config;
pub mod error;
pub mod flash;
pub mod identity;
pub mod middleware;
pub mod policy;
pub mod routes;
pub mod server;
pub mod state;
pub mod telemetry;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
