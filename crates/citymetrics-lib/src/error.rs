use std::path::PathBuf;

use thiserror::Error;

use crate::category::Category;

/// Convenient result alias for the city metrics library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Database file could not be located at the configured path.
    #[error("database not found at {path}")]
    DatabaseNotFound { path: PathBuf },

    /// No record matched the requested capital (and country, when given).
    #[error("City '{name}' not found in database")]
    CityNotFound {
        name: String,
        country: Option<String>,
    },

    /// The `city_metrics` table has no rows at all.
    #[error("No cities found in database")]
    EmptyDataset,

    /// A ranking query returned no rows.
    #[error("No cities found")]
    NoRankedCities,

    /// A search query matched neither a capital nor a country.
    #[error("No cities found matching '{query}'")]
    NoSearchMatches { query: String },

    /// Raised when a category name is not one of the seven known categories.
    #[error("Invalid category '{value}'. Valid categories: {}", format_categories())]
    InvalidCategory { value: String },

    /// A stored score falls outside the 0–10 range.
    #[error("stored {column} value {value} for '{capital}' is outside 0-10")]
    ScoreOutOfRange {
        capital: String,
        column: &'static str,
        value: f64,
    },

    /// The blocking query task was cancelled or panicked.
    #[error("query task aborted: {message}")]
    QueryAborted { message: String },

    /// Wrapper for SQLite errors.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

impl Error {
    /// True for errors caused by a well-formed request that matched no rows.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::CityNotFound { .. }
                | Error::EmptyDataset
                | Error::NoRankedCities
                | Error::NoSearchMatches { .. }
        )
    }
}

fn format_categories() -> String {
    let names = Category::ALL
        .iter()
        .map(|c| format!("'{}'", c.as_str()))
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{}]", names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_category_lists_every_category() {
        let err = Error::InvalidCategory {
            value: "nightlife".to_string(),
        };
        let message = err.to_string();

        assert!(message.contains("'nightlife'"));
        for category in Category::ALL {
            assert!(message.contains(category.as_str()), "missing {}", category);
        }
    }

    #[test]
    fn city_not_found_names_the_lookup_key() {
        let err = Error::CityNotFound {
            name: "Atlantis".to_string(),
            country: None,
        };
        assert_eq!(err.to_string(), "City 'Atlantis' not found in database");
        assert!(err.is_not_found());
    }

    #[test]
    fn data_access_errors_are_not_not_found() {
        let err = Error::Sqlite(rusqlite::Error::InvalidQuery);
        assert!(!err.is_not_found());
    }
}
