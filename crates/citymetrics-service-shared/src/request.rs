//! Query parameter types and validation for HTTP endpoints.
//!
//! Handlers receive parameters through [`ValidatedQuery`], which deserializes
//! the query string and runs [`Validate`] before the handler body executes, so
//! invalid input never reaches the database.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use citymetrics_lib::Category;

use crate::middleware::RequestId;
use crate::problem::{from_lib_error, ProblemDetails};

/// Number of results returned when `limit` is omitted.
pub const DEFAULT_LIMIT: usize = 10;

/// Largest accepted `limit`.
pub const MAX_LIMIT: usize = 50;

/// Shortest accepted search term, in characters.
pub const MIN_QUERY_CHARS: usize = 2;

/// Validation trait for request types.
///
/// Implementations should validate all fields and return a `ProblemDetails`
/// error for invalid input.
pub trait Validate {
    /// Validate the request, returning an error if invalid.
    ///
    /// The `request_id` is used to populate the `instance` field of any
    /// returned `ProblemDetails`.
    ///
    /// Returns a boxed `ProblemDetails` to avoid large `Result::Err` variants.
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>>;
}

/// Query string extractor that rejects malformed or invalid parameters with
/// a 422 problem.
#[derive(Debug, Clone)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = ProblemDetails;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let request_id = RequestId::from_parts(parts);

        let Query(params) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                ProblemDetails::validation_failed(rejection.body_text(), request_id.as_str())
            })?;

        params.validate(request_id.as_str()).map_err(|problem| *problem)?;
        Ok(Self(params))
    }
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

fn validate_limit(limit: usize, request_id: &str) -> Result<(), Box<ProblemDetails>> {
    if limit == 0 {
        return Err(Box::new(ProblemDetails::validation_failed(
            "The 'limit' parameter must be at least 1",
            request_id,
        )));
    }

    if limit > MAX_LIMIT {
        return Err(Box::new(ProblemDetails::validation_failed(
            format!("The 'limit' parameter cannot exceed {}", MAX_LIMIT),
            request_id,
        )));
    }

    Ok(())
}

/// Parameters for the ranking endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitParams {
    /// Maximum number of cities to return.
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl Default for LimitParams {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Validate for LimitParams {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        validate_limit(self.limit, request_id)
    }
}

/// Parameters for `/city/{name}` lookups.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CityParams {
    /// Disambiguates capitals that exist in several countries.
    #[serde(default)]
    pub country: Option<String>,
}

impl CityParams {
    /// The country filter, treating an empty value as absent.
    pub fn country(&self) -> Option<&str> {
        self.country.as_deref().filter(|c| !c.is_empty())
    }
}

impl Validate for CityParams {
    fn validate(&self, _request_id: &str) -> Result<(), Box<ProblemDetails>> {
        Ok(())
    }
}

/// Parameters for `/search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchParams {
    /// Substring to look for in capital and country names.
    pub query: String,

    /// Maximum number of matches to return.
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl Validate for SearchParams {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        if self.query.chars().count() < MIN_QUERY_CHARS {
            return Err(Box::new(ProblemDetails::validation_failed(
                format!(
                    "The 'query' parameter must be at least {} characters",
                    MIN_QUERY_CHARS
                ),
                request_id,
            )));
        }

        validate_limit(self.limit, request_id)
    }
}

/// Parse a category path segment, case-insensitively.
pub fn parse_category(raw: &str, request_id: &str) -> Result<Category, Box<ProblemDetails>> {
    raw.parse::<Category>()
        .map_err(|e| Box::new(from_lib_error(&e, request_id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_defaults_to_ten() {
        let params: LimitParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.limit, 10);
        assert!(params.validate("test").is_ok());
    }

    #[test]
    fn test_limit_bounds() {
        assert!(LimitParams { limit: 1 }.validate("test").is_ok());
        assert!(LimitParams { limit: 50 }.validate("test").is_ok());

        let err = LimitParams { limit: 0 }.validate("test").unwrap_err();
        assert_eq!(err.status, 422);
        assert!(err.detail.as_deref().unwrap().contains("at least 1"));

        let err = LimitParams { limit: 51 }.validate("test").unwrap_err();
        assert!(err.detail.as_deref().unwrap().contains("exceed 50"));
    }

    #[test]
    fn test_search_query_too_short() {
        let params = SearchParams {
            query: "p".to_string(),
            limit: 10,
        };
        let err = params.validate("req-1").unwrap_err();
        assert_eq!(err.status, 422);
        assert!(err.detail.as_deref().unwrap().contains("'query'"));
        assert_eq!(err.instance.as_deref(), Some("req-1"));
    }

    #[test]
    fn test_search_query_counts_characters_not_bytes() {
        let params = SearchParams {
            query: "ö".to_string(),
            limit: 10,
        };
        assert!(params.validate("test").is_err());

        let params = SearchParams {
            query: "öl".to_string(),
            limit: 10,
        };
        assert!(params.validate("test").is_ok());
    }

    #[test]
    fn test_search_limit_checked_after_query() {
        let params = SearchParams {
            query: "par".to_string(),
            limit: 51,
        };
        let err = params.validate("test").unwrap_err();
        assert!(err.detail.as_deref().unwrap().contains("'limit'"));
    }

    #[test]
    fn test_city_params_blank_country_is_absent() {
        let params = CityParams {
            country: Some(String::new()),
        };
        assert_eq!(params.country(), None);

        let params = CityParams {
            country: Some("France".to_string()),
        };
        assert_eq!(params.country(), Some("France"));
    }

    #[test]
    fn test_parse_category() {
        assert_eq!(parse_category("Navigation", "t").unwrap(), Category::Navigation);

        let err = parse_category("food", "t").unwrap_err();
        assert_eq!(err.status, 400);
        assert!(err.detail.as_deref().unwrap().contains("eco_friendly"));
    }
}
