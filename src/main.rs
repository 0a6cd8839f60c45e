//! Wertwerk - asset valuation and market-context service.
//!
//! Prices real estate, luxury watches and vehicles from free-text
//! descriptions and serves explained, benchmarked valuation reports.

use anyhow::Result;
use wertwerk::common::logging::init_logging;
use wertwerk::common::Config;
use wertwerk::ValuationService;

#[tokio::main]
async fn main() -> Result<()> {
    // Start timing immediately for cold-start measurement
    let startup_start = std::time::Instant::now();

    // Load configuration
    let config = Config::load_with_env()?;

    // Initialize logging
    init_logging(
        &config.observability.log_level,
        &config.observability.log_format,
    );

    tracing::info!("Wertwerk v{}", env!("CARGO_PKG_VERSION"));

    let service = ValuationService::new(config);

    let startup_duration = startup_start.elapsed();
    tracing::info!(
        duration_ms = startup_duration.as_millis() as u64,
        "Service initialized in {:?}",
        startup_duration
    );

    service.start().await
}
