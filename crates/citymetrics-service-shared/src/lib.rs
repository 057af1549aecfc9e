//! Shared infrastructure for the city travel metrics HTTP service.
//!
//! - [`AppState`]: Store handle plus a blocking-pool runner for queries
//! - [`health`]: Database health check and liveness probe
//! - [`ProblemDetails`]: RFC 9457 Problem Details for consistent error responses
//! - [`ValidatedQuery`]: Query extractor that validates before handlers run
//! - [`metrics`]: Prometheus metrics infrastructure
//! - [`logging`]: Structured JSON logging setup
//! - [`middleware`]: Request tracking and metrics middleware
//! - [`ServiceConfig`]: Environment configuration and CORS policy
//!
//! # Architecture
//!
//! Handlers stay thin. All SQL and row mapping lives in `citymetrics-lib`;
//! this crate provides only HTTP glue:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  axum Handler                                               │
//! │  - Extract and validate query parameters                    │
//! │  - Call citymetrics-lib on the blocking pool                │
//! │  - Map library errors to problems                           │
//! │  - Format response                                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Testing Support
//!
//! The [`test_utils`] module builds fixture databases for handler tests.
//! Enable the `test-utils` feature to access it from dependent crates.

#![deny(warnings)]

mod config;
pub mod health;
pub mod logging;
pub mod metrics;
pub mod middleware;
mod problem;
mod request;
mod response;
mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{ServiceConfig, DEFAULT_CORS_ORIGINS};
pub use health::{health_check, health_live, HealthStatus, LivenessStatus, SERVICE_NAME};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use metrics::{
    failure_outcome, init_metrics, metrics_handler, record_city_query, record_rows_returned,
    MetricsConfig, MetricsError,
};
pub use middleware::{extract_or_generate_request_id, MetricsLayer, RequestId, REQUEST_ID_HEADER};
pub use problem::{
    from_lib_error, ProblemDetails, PROBLEM_CITY_NOT_FOUND, PROBLEM_INTERNAL_ERROR,
    PROBLEM_INVALID_CATEGORY, PROBLEM_NOT_FOUND, PROBLEM_NO_RESULTS, PROBLEM_VALIDATION_FAILED,
};
pub use request::{
    parse_category, CityParams, LimitParams, SearchParams, Validate, ValidatedQuery,
    DEFAULT_LIMIT, MAX_LIMIT, MIN_QUERY_CHARS,
};
pub use response::{ApiIndex, ApiResult, CategoryRanking, CityList};
pub use state::AppState;
