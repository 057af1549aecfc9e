//! Test utilities for handler testing.
//!
//! Fixture databases are built in temporary directories with the same table
//! layout the curation process produces. Each [`TestFixture`] owns its
//! directory, so keep it alive for the duration of the test.

use rusqlite::{params, Connection};
use tempfile::TempDir;

use citymetrics_lib::schema::CREATE_CITY_METRICS;
use citymetrics_lib::CityStore;

use crate::state::AppState;

/// Known capitals in the fixture database for use in tests.
pub mod fixture_cities {
    /// Highest overall score (8.9); recommendations stored comma-separated.
    pub const OSLO: &str = "Oslo";

    /// Lowest safety score (6.5); recommendations stored as a JSON array.
    pub const PARIS: &str = "Paris";

    /// Recommendations stored one per line.
    pub const LISBON: &str = "Lisbon";

    /// Lowest overall score (6.9); a single plain-text recommendation.
    pub const VALLETTA: &str = "Valletta";

    /// Recommendations column is NULL.
    pub const LUXEMBOURG: &str = "Luxembourg";

    /// Highest safety score (9.6).
    pub const REYKJAVIK: &str = "Reykjavik";

    /// Number of rows in the fixture.
    pub const COUNT: usize = 8;
}

/// One fixture row: capital, country, overall score, the seven category
/// scores in [`citymetrics_lib::Category::ALL`] order, and raw recommendations.
type FixtureRow = (
    &'static str,
    &'static str,
    f64,
    [f64; 7],
    Option<&'static str>,
);

const DEFAULT_RECOMMENDATIONS: &str = r#"["Walk the old town","Try the local market"]"#;

const FIXTURE_ROWS: [FixtureRow; fixture_cities::COUNT] = [
    (
        "Paris",
        "France",
        8.2,
        [6.5, 7.0, 9.3, 5.1, 9.0, 8.4, 6.8],
        Some(r#"["Visit the Louvre early","Use the metro"]"#),
    ),
    (
        "Oslo",
        "Norway",
        8.9,
        [9.4, 9.1, 7.8, 8.6, 7.2, 8.0, 9.8],
        Some("Buy an Oslo Pass, Take the ferry, Hike Holmenkollen"),
    ),
    (
        "Lisbon",
        "Portugal",
        7.6,
        [8.1, 7.4, 8.9, 7.0, 8.3, 7.1, 7.3],
        Some("Ride tram 28\nEat pastel de nata\n"),
    ),
    (
        "Valletta",
        "Malta",
        6.9,
        [8.8, 6.0, 7.5, 7.9, 7.4, 8.7, 5.9],
        Some("Explore the Grand Harbour"),
    ),
    (
        "Luxembourg",
        "Luxembourg",
        7.3,
        [9.0, 7.8, 6.4, 8.8, 6.9, 9.1, 7.7],
        None,
    ),
    (
        "Vienna",
        "Austria",
        8.5,
        [9.2, 8.6, 8.1, 8.2, 8.8, 9.0, 8.4],
        Some(DEFAULT_RECOMMENDATIONS),
    ),
    (
        "Reykjavik",
        "Iceland",
        7.9,
        [9.6, 9.3, 7.2, 9.4, 6.7, 7.5, 9.5],
        Some(DEFAULT_RECOMMENDATIONS),
    ),
    (
        "Madrid",
        "Spain",
        8.0,
        [7.6, 6.9, 9.1, 6.2, 8.9, 8.2, 6.5],
        Some(DEFAULT_RECOMMENDATIONS),
    ),
];

/// Application state backed by a temporary database.
pub struct TestFixture {
    state: AppState,
    _dir: TempDir,
}

impl TestFixture {
    /// A clone of the state, ready to hand to a router.
    pub fn state(&self) -> AppState {
        self.state.clone()
    }
}

/// State over the eight-capital fixture database.
pub fn fixture_state() -> TestFixture {
    build(|conn| {
        conn.execute_batch(CREATE_CITY_METRICS)
            .expect("create city_metrics");
        for row in &FIXTURE_ROWS {
            insert_row(conn, row);
        }
    })
}

/// State over a database whose `city_metrics` table has no rows.
pub fn empty_state() -> TestFixture {
    build(|conn| {
        conn.execute_batch(CREATE_CITY_METRICS)
            .expect("create city_metrics");
    })
}

/// State over a database file that lacks the `city_metrics` table.
pub fn no_table_state() -> TestFixture {
    build(|conn| {
        conn.execute_batch("CREATE TABLE unrelated (id INTEGER PRIMARY KEY);")
            .expect("create unrelated table");
    })
}

/// State pointing at a database file that does not exist.
pub fn missing_state() -> TestFixture {
    let dir = TempDir::new().expect("create temp dir");
    let store = CityStore::new(dir.path().join("missing.db"));
    TestFixture {
        state: AppState::new(store),
        _dir: dir,
    }
}

fn build(setup: impl FnOnce(&Connection)) -> TestFixture {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("travel_metrics.db");
    let conn = Connection::open(&path).expect("open fixture db");
    setup(&conn);
    drop(conn);

    TestFixture {
        state: AppState::new(CityStore::new(path)),
        _dir: dir,
    }
}

fn insert_row(conn: &Connection, row: &FixtureRow) {
    let (capital, country, overall, scores, recommendations) = *row;
    let [safety, sustainability, enjoyment, calmcation, cultural, navigation, eco] = scores;
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
            ?12, 'Old town', 'Traffic', 12, 340
        )",
        params![
            country,
            capital,
            format!("{} is the capital of {}.", capital, country),
            safety,
            sustainability,
            enjoyment,
            calmcation,
            cultural,
            navigation,
            eco,
            recommendations,
            overall,
        ],
    )
    .expect("insert fixture city");
}

/// Generate a unique request ID for testing.
pub fn test_request_id() -> String {
    format!("test-{}", uuid::Uuid::now_v7())
}
