//! Common test utilities and fixture helpers.
//!
//! Builds throwaway `city_metrics` databases in temporary directories so each
//! test controls exactly which rows exist.

use citymetrics_lib::schema::CREATE_CITY_METRICS;
use citymetrics_lib::{Category, CityStore};
use rusqlite::{params, Connection};
use tempfile::TempDir;

/// One row to insert into a fixture database.
#[derive(Debug, Clone)]
pub struct FixtureCity {
    pub capital: &'static str,
    pub country: &'static str,
    pub overall_score: f64,
    pub category_scores: [f64; 7],
    pub recommendations: Option<&'static str>,
}

impl FixtureCity {
    pub fn new(capital: &'static str, country: &'static str, overall_score: f64) -> Self {
        Self {
            capital,
            country,
            overall_score,
            category_scores: [overall_score; 7],
            recommendations: Some(r#"["Walk everywhere","Try the local bakery"]"#),
        }
    }

    pub fn score(mut self, category: Category, score: f64) -> Self {
        let idx = Category::ALL
            .iter()
            .position(|c| *c == category)
            .expect("category listed in ALL");
        self.category_scores[idx] = score;
        self
    }

    pub fn recommendations(mut self, raw: Option<&'static str>) -> Self {
        self.recommendations = raw;
        self
    }
}

/// Temporary database plus a store pointing at it.
///
/// Keep the value alive for the duration of the test; dropping it deletes the
/// directory.
pub struct FixtureDb {
    #[allow(dead_code)]
    pub dir: TempDir,
    pub store: CityStore,
}

/// Create an empty `city_metrics` table.
pub fn empty_db() -> FixtureDb {
    fixture_db(&[])
}

/// Create a database holding `cities`, inserted in slice order.
pub fn fixture_db(cities: &[FixtureCity]) -> FixtureDb {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("travel_metrics.db");
    let conn = Connection::open(&path).expect("open fixture db");
    conn.execute_batch(CREATE_CITY_METRICS)
        .expect("create city_metrics");
    for city in cities {
        insert_city(&conn, city);
    }
    drop(conn);

    FixtureDb {
        store: CityStore::new(path),
        dir,
    }
}

fn insert_city(conn: &Connection, city: &FixtureCity) {
    let [safety, sustainability, enjoyment, calmcation, cultural, navigation, eco] =
        city.category_scores;
    let description = format!("{} is the capital of {}.", city.capital, city.country);
    let recs = city.recommendations;
    conn.execute(
        "INSERT INTO city_metrics (
            country, capital, analysis_date, city_description, overall_summary,
            safety_score, safety_description, safety_tips, safety_recommendations,
            sustainability_score, sustainability_description, sustainability_tips, sustainability_recommendations,
            enjoyment_score, enjoyment_description, enjoyment_tips, enjoyment_recommendations,
            calmcation_score, calmcation_description, calmcation_tips, calmcation_recommendations,
            cultural_exchange_score, cultural_exchange_description, cultural_exchange_tips, cultural_exchange_recommendations,
            navigation_score, navigation_description, navigation_tips, navigation_recommendations,
            eco_friendly_score, eco_friendly_description, eco_friendly_tips, eco_friendly_recommendations,
            overall_score, best_features, improvement_areas, post_count, total_engagement
        ) VALUES (
            ?1, ?2, '2025-03-01', ?3, 'Summary',
            ?4, 'Safety notes', 'Safety tips', ?11,
            ?5, 'Sustainability notes', 'Sustainability tips', ?11,
            ?6, 'Enjoyment notes', 'Enjoyment tips', ?11,
            ?7, 'Calmcation notes', 'Calmcation tips', ?11,
            ?8, 'Culture notes', 'Culture tips', ?11,
            ?9, 'Navigation notes', 'Navigation tips', ?11,
            ?10, 'Eco notes', 'Eco tips', ?11,
            ?12, 'Old town', 'Traffic', 42, 1337
        )",
        params![
            city.country,
            city.capital,
            description,
            safety,
            sustainability,
            enjoyment,
            calmcation,
            cultural,
            navigation,
            eco,
            recs,
            city.overall_score,
        ],
    )
    .expect("insert fixture city");
}
