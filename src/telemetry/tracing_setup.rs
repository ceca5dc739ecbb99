//! OpenTelemetry tracing setup

use crate::config::TelemetryConfig;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{trace::SdkTracerProvider, Resource};

/// Build an OTLP-exporting tracer provider if tracing is enabled.
///
/// Misconfiguration is reported on stderr and disables export rather than
/// failing startup; the subscriber is not installed yet at this point.
pub fn create_tracer_provider(config: &TelemetryConfig) -> Option<SdkTracerProvider> {
    if !config.tracing_enabled {
        return None;
    }

    let Some(endpoint) = config.otlp_endpoint.clone() else {
        eprintln!(
            "WARN: OTEL_TRACING_ENABLED=true but OTEL_EXPORTER_OTLP_ENDPOINT not set, skipping"
        );
        return None;
    };

    let exporter = match opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()
    {
        Ok(e) => e,
        Err(err) => {
            eprintln!("ERROR: Failed to create OTLP exporter: {}", err);
            return None;
        }
    };

    let resource = Resource::builder()
        .with_service_name(config.service_name.clone())
        .build();

    let provider = SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(resource)
        .build();

    opentelemetry::global::set_tracer_provider(provider.clone());

    Some(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_tracing_has_no_provider() {
        let config = TelemetryConfig::default();
        assert!(create_tracer_provider(&config).is_none());
    }

    #[test]
    fn test_missing_endpoint_has_no_provider() {
        let config = TelemetryConfig {
            tracing_enabled: true,
            otlp_endpoint: None,
            ..TelemetryConfig::default()
        };
        assert!(create_tracer_provider(&config).is_none());
    }
}
