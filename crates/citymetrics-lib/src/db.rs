//! Read-only access to the `city_metrics` SQLite table.
//!
//! [`CityStore`] holds only the database location. Every query opens a fresh
//! read-only connection, runs one parameterized statement, maps the rows, and
//! drops the statement and connection before returning, including when the
//! query fails.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::functions::FunctionFlags;
use rusqlite::{params, Connection, OpenFlags, Params, Row};
use tracing::{debug, warn};

use crate::category::Category;
use crate::error::{Error, Result};
use crate::models::{
    CategoryRankedCity, CityMetrics, CityOverview, RankedCity, ScoreCard, SearchHit,
};

/// Default time SQLite waits on a locked database before failing a query.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCORE_COLUMNS: &str = "overall_score, safety_score, sustainability_score, \
     enjoyment_score, calmcation_score, cultural_exchange_score, \
     navigation_score, eco_friendly_score";

/// Handle to the city metrics database.
#[derive(Debug, Clone)]
pub struct CityStore {
    path: PathBuf,
    busy_timeout: Duration,
}

impl CityStore {
    /// Create a store reading from the SQLite file at `path`.
    ///
    /// Nothing is opened here; the file is only touched when a query runs.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    /// Override how long a query waits on a locked database.
    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Location of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection> {
        if !self.path.exists() {
            warn!(path = %self.path.display(), "city metrics database is missing");
            return Err(Error::DatabaseNotFound {
                path: self.path.clone(),
            });
        }

        let connection = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        connection.busy_timeout(self.busy_timeout)?;
        register_casefold(&connection)?;
        Ok(connection)
    }

    /// Run one parameterized query and map every returned row.
    ///
    /// Rows are handed to `map` in result order; columns should be read by
    /// name. Fails with [`Error::Sqlite`] if the store cannot be opened or the
    /// statement is malformed.
    pub fn query<T, P, F>(&self, sql: &str, params: P, map: F) -> Result<Vec<T>>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let connection = self.connect()?;
        let mut statement = connection.prepare(sql)?;
        let rows = statement.query_map(params, map)?;

        let mut mapped = Vec::new();
        for row in rows {
            mapped.push(row?);
        }
        debug!(rows = mapped.len(), "query completed");
        Ok(mapped)
    }

    /// Number of rows in the table. Used by the health check.
    pub fn count(&self) -> Result<i64> {
        let counts = self.query(
            "SELECT COUNT(*) AS count FROM city_metrics",
            [],
            |row| row.get::<_, i64>("count"),
        )?;
        Ok(counts.into_iter().next().unwrap_or_default())
    }

    /// All cities ordered by capital.
    pub fn list_cities(&self) -> Result<Vec<CityOverview>> {
        let cities = self.query(
            "SELECT capital, country, overall_score, analysis_date \
             FROM city_metrics \
             ORDER BY capital, id",
            [],
            CityOverview::from_row,
        )?;

        if cities.is_empty() {
            return Err(Error::EmptyDataset);
        }
        Ok(cities)
    }

    /// Full record for a capital, matched case-insensitively.
    ///
    /// When several countries share the capital name and `country` is not
    /// given, the row with the lowest `id` wins.
    pub fn city(&self, name: &str, country: Option<&str>) -> Result<CityMetrics> {
        let record = self
            .lookup(name, country, "*", CityMetrics::from_row)?
            .ok_or_else(|| not_found(name, country))?;
        record.check_scores()?;
        Ok(record)
    }

    /// Score-only view of a capital, matched like [`CityStore::city`].
    pub fn city_scores(&self, name: &str, country: Option<&str>) -> Result<ScoreCard> {
        let columns = format!("capital, country, {}", SCORE_COLUMNS);
        self.lookup(name, country, &columns, ScoreCard::from_row)?
            .ok_or_else(|| not_found(name, country))
    }

    fn lookup<T, F>(
        &self,
        name: &str,
        country: Option<&str>,
        columns: &str,
        map: F,
    ) -> Result<Option<T>>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let rows = match non_empty(country) {
            Some(country) => self.query(
                &format!(
                    "SELECT {columns} FROM city_metrics \
                     WHERE casefold(capital) = casefold(?1) AND casefold(country) = casefold(?2) \
                     ORDER BY id LIMIT 1"
                ),
                params![name, country],
                map,
            )?,
            None => self.query(
                &format!(
                    "SELECT {columns} FROM city_metrics \
                     WHERE casefold(capital) = casefold(?1) \
                     ORDER BY id LIMIT 1"
                ),
                params![name],
                map,
            )?,
        };
        Ok(rows.into_iter().next())
    }

    /// Top `limit` cities by overall score, ranked from 1.
    pub fn top_cities(&self, limit: usize) -> Result<Vec<RankedCity>> {
        let sql = format!(
            "SELECT capital, country, {SCORE_COLUMNS}, city_description \
             FROM city_metrics \
             ORDER BY overall_score DESC, id \
             LIMIT ?1"
        );
        let mut cities = self.query(&sql, params![limit as i64], RankedCity::from_row)?;

        if cities.is_empty() {
            return Err(Error::NoRankedCities);
        }
        for (idx, city) in cities.iter_mut().enumerate() {
            city.rank = idx + 1;
        }
        Ok(cities)
    }

    /// Top `limit` cities by one category's score, ranked from 1.
    pub fn top_cities_by_category(
        &self,
        category: Category,
        limit: usize,
    ) -> Result<Vec<CategoryRankedCity>> {
        let column = category.score_column();
        let sql = format!(
            "SELECT capital, country, {column} AS category_score, \
                    overall_score, city_description \
             FROM city_metrics \
             ORDER BY {column} DESC, id \
             LIMIT ?1"
        );
        let mut cities = self.query(&sql, params![limit as i64], CategoryRankedCity::from_row)?;

        if cities.is_empty() {
            return Err(Error::NoRankedCities);
        }
        for (idx, city) in cities.iter_mut().enumerate() {
            city.rank = idx + 1;
        }
        Ok(cities)
    }

    /// Cities whose capital or country contains `query`, case-insensitively.
    ///
    /// LIKE wildcards in `query` are escaped so the match is a plain substring
    /// test.
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        let pattern = format!("%{}%", escape_like(query));
        let hits = self.query(
            "SELECT capital, country, overall_score, city_description \
             FROM city_metrics \
             WHERE casefold(capital) LIKE casefold(?1) ESCAPE '\\' \
                OR casefold(country) LIKE casefold(?1) ESCAPE '\\' \
             ORDER BY overall_score DESC, id \
             LIMIT ?2",
            params![pattern, limit as i64],
            SearchHit::from_row,
        )?;

        if hits.is_empty() {
            return Err(Error::NoSearchMatches {
                query: query.to_string(),
            });
        }
        Ok(hits)
    }
}

/// Register `casefold(text)`, a Unicode-aware replacement for SQLite's
/// ASCII-only `LOWER()`. NULL stays NULL.
fn register_casefold(connection: &Connection) -> rusqlite::Result<()> {
    connection.create_scalar_function(
        "casefold",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let value: Option<String> = ctx.get(0)?;
            Ok(value.map(|text| text.to_lowercase()))
        },
    )
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn not_found(name: &str, country: Option<&str>) -> Error {
    Error::CityNotFound {
        name: name.to_string(),
        country: non_empty(country).map(str::to_string),
    }
}

fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for ch in query.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_like_protects_wildcards() {
        assert_eq!(escape_like("par"), "par");
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }

    #[test]
    fn empty_country_is_ignored() {
        assert_eq!(non_empty(Some("")), None);
        assert_eq!(non_empty(Some("France")), Some("France"));
        assert_eq!(non_empty(None), None);
    }

    #[test]
    fn missing_database_is_reported() {
        let store = CityStore::new("/nonexistent/travel_metrics.db");
        let err = store.count().unwrap_err();
        assert!(matches!(err, Error::DatabaseNotFound { .. }));
    }
}
