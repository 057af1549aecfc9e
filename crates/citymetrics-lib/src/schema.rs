//! Expected layout of the `city_metrics` table.
//!
//! The table is created and populated by an external curation process; this
//! crate never runs the DDL below against a live database. It documents the
//! columns the queries rely on and lets tests build fixture databases.

/// DDL for the `city_metrics` table as the curation process writes it.
pub const CREATE_CITY_METRICS: &str = r#"
CREATE TABLE IF NOT EXISTS city_metrics (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    country TEXT NOT NULL,
    capital TEXT NOT NULL,
    analysis_date TEXT,

    city_description TEXT,
    overall_summary TEXT,

    safety_score REAL,
    safety_description TEXT,
    safety_tips TEXT,
    safety_recommendations TEXT,

    sustainability_score REAL,
    sustainability_description TEXT,
    sustainability_tips TEXT,
    sustainability_recommendations TEXT,

    enjoyment_score REAL,
    enjoyment_description TEXT,
    enjoyment_tips TEXT,
    enjoyment_recommendations TEXT,

    calmcation_score REAL,
    calmcation_description TEXT,
    calmcation_tips TEXT,
    calmcation_recommendations TEXT,

    cultural_exchange_score REAL,
    cultural_exchange_description TEXT,
    cultural_exchange_tips TEXT,
    cultural_exchange_recommendations TEXT,

    navigation_score REAL,
    navigation_description TEXT,
    navigation_tips TEXT,
    navigation_recommendations TEXT,

    eco_friendly_score REAL,
    eco_friendly_description TEXT,
    eco_friendly_tips TEXT,
    eco_friendly_recommendations TEXT,

    overall_score REAL,
    best_features TEXT,
    improvement_areas TEXT,

    post_count INTEGER DEFAULT 0,
    total_engagement INTEGER DEFAULT 0,

    UNIQUE(country, capital)
);
"#;
