//! Endpoints served by the gateway itself, outside the access layer

pub mod health;
pub mod metrics;
