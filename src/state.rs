//! Application state shared by the router

use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

use crate::config::Config;
use crate::middleware::AccessState;
use crate::policy::AccessPolicy;

/// Immutable state built once at startup
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub access: AccessState,
    pub prometheus: Arc<Option<PrometheusHandle>>,
}

impl AppState {
    pub fn new(config: Config, prometheus: Option<PrometheusHandle>) -> Self {
        let access = AccessState::new(
            AccessPolicy::default(),
            config.cookies.clone(),
            config.security_headers.clone(),
        );
        Self {
            config: Arc::new(config),
            access,
            prometheus: Arc::new(prometheus),
        }
    }
}
