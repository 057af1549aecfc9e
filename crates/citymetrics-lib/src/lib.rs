//! City travel metrics library entry points.
//!
//! This crate reads precomputed travel scores for European capitals from a
//! SQLite `city_metrics` table: lookups by name, listings, rankings overall
//! and per category, and substring search. Higher-level consumers (the HTTP
//! service) should only depend on the items exported here instead of writing
//! SQL of their own.
//!

#![deny(warnings)]

pub mod category;
pub mod db;
pub mod error;
pub mod models;
pub mod recommendations;
pub mod schema;

pub use category::Category;
pub use db::{CityStore, DEFAULT_BUSY_TIMEOUT};
pub use error::{Error, Result};
pub use models::{
    CategoryRankedCity, CategoryScores, CityMetrics, CityOverview, MetricDetail, RankedCity,
    ScoreCard, SearchHit, SCORE_RANGE,
};
pub use recommendations::parse_recommendations;
