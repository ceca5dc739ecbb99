use anyhow::Result;
use barber_gate::{config::Config, server, telemetry};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    let telemetry = telemetry::init(&config.telemetry)?;

    info!("Starting barbershop gateway");
    info!("HTTP server listening on {}", config.http_addr());
    info!("Serving frontend from {}", config.frontend_dir.display());

    let result = server::run(config, telemetry.prometheus.clone()).await;
    telemetry.shutdown();
    result
}
