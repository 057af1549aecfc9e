//! City travel metrics HTTP service binary.
//!
//! # Configuration
//!
//! - `CITYMETRICS_DB_PATH` - Path to the SQLite database (default: travel_metrics.db)
//! - `SERVICE_PORT` - HTTP port (default: 8000)
//! - `CORS_ORIGINS` - Comma-separated allowed origins
//! - `DB_BUSY_TIMEOUT_MS` - SQLite busy timeout (default: 5000)
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text
//! - `METRICS_ENABLED` / `METRICS_PATH` - Prometheus endpoint settings

use tracing::{info, warn};

use citymetrics_service::router;
use citymetrics_service_shared::{
    AppState, LoggingConfig, MetricsConfig, ServiceConfig, init_logging, init_metrics,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logging_config = LoggingConfig::from_env();
    init_logging(&logging_config)?;

    let metrics_config = MetricsConfig::from_env();
    if let Err(e) = init_metrics(&metrics_config) {
        // Metrics are optional; the API keeps serving without them.
        warn!(error = %e, "failed to initialize metrics, continuing without metrics");
    }

    let config = ServiceConfig::from_env();
    info!(
        db_path = %config.db_path.display(),
        port = config.port,
        cors_origins = ?config.cors_origins,
        "starting city metrics service"
    );

    let state = AppState::new(config.store());
    let app = router(state, &config, &metrics_config);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}
