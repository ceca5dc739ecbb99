//! Configuration management for the barbershop gateway

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

use crate::identity::{CookieNames, AUTH_TOKEN_COOKIE, USER_ROLE_COOKIE};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server host
    pub http_host: String,
    /// HTTP server port
    pub http_port: u16,
    /// Directory holding the built frontend bundle
    pub frontend_dir: PathBuf,
    /// Session cookie names
    pub cookies: CookieNames,
    /// Security headers configuration
    pub security_headers: SecurityHeadersConfig,
    /// Telemetry configuration
    pub telemetry: TelemetryConfig,
}

/// Headers attached to every response that passes the access check
#[derive(Debug, Clone)]
pub struct SecurityHeadersConfig {
    pub hsts_enabled: bool,
    /// Only emit HSTS when the request arrived over HTTPS
    pub hsts_https_only: bool,
    /// Treat `x-forwarded-proto: https` from the proxy as HTTPS
    pub hsts_trust_x_forwarded_proto: bool,
    pub hsts_max_age_secs: u64,
    pub hsts_include_subdomains: bool,
    pub hsts_preload: bool,
}

impl Default for SecurityHeadersConfig {
    fn default() -> Self {
        Self {
            hsts_enabled: false,
            hsts_https_only: true,
            hsts_trust_x_forwarded_proto: true,
            hsts_max_age_secs: 31_536_000,
            hsts_include_subdomains: true,
            hsts_preload: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// "json" or "pretty"
    pub log_format: String,
    pub metrics_enabled: bool,
    pub tracing_enabled: bool,
    pub otlp_endpoint: Option<String>,
    pub service_name: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_format: "pretty".to_string(),
            metrics_enabled: true,
            tracing_enabled: false,
            otlp_endpoint: None,
            service_name: "barber-gate".to_string(),
        }
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .map(|s| s.to_lowercase() == "true")
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let security_defaults = SecurityHeadersConfig::default();

        Ok(Self {
            http_host: env::var("HTTP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            http_port: env::var("HTTP_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("Invalid HTTP_PORT")?,
            frontend_dir: env::var("FRONTEND_DIR")
                .unwrap_or_else(|_| "./dist".to_string())
                .into(),
            cookies: CookieNames {
                token: env::var("AUTH_TOKEN_COOKIE")
                    .unwrap_or_else(|_| AUTH_TOKEN_COOKIE.to_string()),
                role: env::var("USER_ROLE_COOKIE")
                    .unwrap_or_else(|_| USER_ROLE_COOKIE.to_string()),
            },
            security_headers: SecurityHeadersConfig {
                hsts_enabled: env_flag("HSTS_ENABLED", security_defaults.hsts_enabled),
                hsts_https_only: env_flag("HSTS_HTTPS_ONLY", security_defaults.hsts_https_only),
                hsts_trust_x_forwarded_proto: env_flag(
                    "HSTS_TRUST_X_FORWARDED_PROTO",
                    security_defaults.hsts_trust_x_forwarded_proto,
                ),
                hsts_max_age_secs: env::var("HSTS_MAX_AGE_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(security_defaults.hsts_max_age_secs),
                hsts_include_subdomains: env_flag(
                    "HSTS_INCLUDE_SUBDOMAINS",
                    security_defaults.hsts_include_subdomains,
                ),
                hsts_preload: env_flag("HSTS_PRELOAD", security_defaults.hsts_preload),
            },
            telemetry: TelemetryConfig {
                log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
                metrics_enabled: env_flag("METRICS_ENABLED", true),
                tracing_enabled: env_flag("OTEL_TRACING_ENABLED", false),
                otlp_endpoint: env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
                    .ok()
                    .filter(|s| !s.trim().is_empty()),
                service_name: env::var("OTEL_SERVICE_NAME")
                    .unwrap_or_else(|_| "barber-gate".to_string()),
            },
        })
    }

    /// Get HTTP server address
    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            http_host: "127.0.0.1".to_string(),
            http_port: 3000,
            frontend_dir: PathBuf::from("./dist"),
            cookies: CookieNames::default(),
            security_headers: SecurityHeadersConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }

    #[test]
    fn test_config_http_addr() {
        let config = test_config();
        assert_eq!(config.http_addr(), "127.0.0.1:3000");
    }

    #[test]
    fn test_config_http_addr_ipv6() {
        let mut config = test_config();
        config.http_host = "::1".to_string();
        config.http_port = 8080;

        assert_eq!(config.http_addr(), "::1:8080");
    }

    #[test]
    fn test_security_headers_default_keeps_hsts_off() {
        let config = SecurityHeadersConfig::default();
        assert!(!config.hsts_enabled);
        assert!(config.hsts_https_only);
        assert_eq!(config.hsts_max_age_secs, 31_536_000);
        assert!(!config.hsts_preload);
    }

    #[test]
    fn test_telemetry_default() {
        let config = TelemetryConfig::default();
        assert_eq!(config.log_format, "pretty");
        assert!(config.metrics_enabled);
        assert!(!config.tracing_enabled);
        assert_eq!(config.service_name, "barber-gate");
    }

    #[test]
    fn test_default_cookie_names() {
        let config = test_config();
        assert_eq!(config.cookies.token, "auth_token");
        assert_eq!(config.cookies.role, "user_role");
    }

    #[test]
    fn test_config_debug() {
        let debug_str = format!("{:?}", test_config());
        assert!(debug_str.contains("Config"));
        assert!(debug_str.contains("frontend_dir"));
    }
}
