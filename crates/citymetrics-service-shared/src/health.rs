//! Health check handlers.
//!
//! `/health` proves the database is reachable by counting rows; it is the
//! only endpoint whose failures are reported as 500 problems. `/health/live`
//! touches nothing and only shows the process is serving.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::metrics::record_city_query;
use crate::middleware::RequestId;
use crate::{AppState, ProblemDetails};

/// Service name reported by the liveness probe.
pub const SERVICE_NAME: &str = "citymetrics";

/// Body of a successful `/health` check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Always "healthy" when returned.
    pub status: String,

    /// Database reachability, "connected" when returned.
    pub database: String,

    /// Number of rows in `city_metrics`.
    pub cities_in_database: i64,
}

impl HealthStatus {
    /// Create a healthy status for a database holding `cities` rows.
    pub fn healthy(cities: i64) -> Self {
        Self {
            status: "healthy".to_string(),
            database: "connected".to_string(),
            cities_in_database: cities,
        }
    }
}

/// Body of the liveness probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessStatus {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Liveness probe handler.
///
/// ```text
/// GET /health/live
/// {"status":"ok","service":"citymetrics","version":"0.1.0"}
/// ```
pub async fn health_live() -> impl IntoResponse {
    let status = LivenessStatus {
        status: "ok".to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    (StatusCode::OK, Json(status))
}

/// Database health check handler.
///
/// ```text
/// GET /health
/// {"status":"healthy","database":"connected","cities_in_database":42}
/// ```
///
/// Any failure, including a missing file or table, returns a 500 problem whose
/// detail carries the underlying error.
pub async fn health_check(State(state): State<AppState>, request_id: RequestId) -> Response {
    match state.run(|store| store.count()).await {
        Ok(count) => {
            record_city_query("health", "ok");
            (StatusCode::OK, Json(HealthStatus::healthy(count))).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "health check failed");
            record_city_query("health", "error");
            ProblemDetails::internal_error(format!("Health check failed: {}", e), request_id.as_str())
                .into_response()
        }
    }
}
