//! Response bodies that wrap library models.
//!
//! Handlers return these through [`ApiResult`], so a success serializes as
//! plain JSON and a failure as a [`ProblemDetails`] body.

use std::collections::BTreeMap;

use axum::Json;
use serde::{Deserialize, Serialize};

use citymetrics_lib::{Category, CategoryRankedCity, CityOverview};

use crate::ProblemDetails;

/// Result type returned by JSON handlers.
pub type ApiResult<T> = Result<Json<T>, ProblemDetails>;

/// Body of `GET /cities`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityList {
    pub cities: Vec<CityOverview>,
    pub total_count: usize,
}

impl CityList {
    pub fn new(cities: Vec<CityOverview>) -> Self {
        Self {
            total_count: cities.len(),
            cities,
        }
    }
}

/// Body of `GET /top-cities/{category}`.
///
/// `category` is always the canonical lowercase name, whatever casing the
/// request used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRanking {
    pub category: Category,
    pub top_cities: Vec<CategoryRankedCity>,
}

/// Body of `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiIndex {
    pub message: String,
    pub endpoints: BTreeMap<String, String>,
    pub categories: Vec<Category>,
}

impl Default for ApiIndex {
    fn default() -> Self {
        let endpoints = [
            ("GET /cities", "List all available cities"),
            ("GET /city/{city_name}", "Get metrics for a specific city"),
            ("GET /city/{city_name}/scores", "Get only scores for a city"),
            ("GET /top-cities", "Get top cities by overall score"),
            (
                "GET /top-cities/{category}",
                "Get top cities by specific category",
            ),
            ("GET /search", "Search cities by capital or country name"),
            ("GET /health", "Check database connectivity"),
            ("GET /health/live", "Liveness probe"),
            ("GET /metrics", "Prometheus metrics"),
        ]
        .into_iter()
        .map(|(route, summary)| (route.to_string(), summary.to_string()))
        .collect();

        Self {
            message: "Welcome to City Travel Metrics API".to_string(),
            endpoints,
            categories: Category::ALL.to_vec(),
        }
    }
}
