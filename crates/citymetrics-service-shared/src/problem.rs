//! RFC 9457 Problem Details for HTTP APIs.
//!
//! Every error the service returns uses this shape, so clients can rely on a
//! `detail` message alongside the problem class.
//! See: <https://www.rfc-editor.org/rfc/rfc9457.html>

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use citymetrics_lib::Error as LibError;

/// Problem type URI for a capital that is not in the database.
pub const PROBLEM_CITY_NOT_FOUND: &str = "/problems/city-not-found";

/// Problem type URI for listings, rankings, and searches with no rows.
pub const PROBLEM_NO_RESULTS: &str = "/problems/no-results";

/// Problem type URI for an unknown metric category.
pub const PROBLEM_INVALID_CATEGORY: &str = "/problems/invalid-category";

/// Problem type URI for query parameters that fail validation.
pub const PROBLEM_VALIDATION_FAILED: &str = "/problems/validation-failed";

/// Problem type URI for unknown routes.
pub const PROBLEM_NOT_FOUND: &str = "/problems/not-found";

/// Problem type URI for internal server errors.
pub const PROBLEM_INTERNAL_ERROR: &str = "/problems/internal-error";

/// RFC 9457 Problem Details response structure.
///
/// # Example
///
/// ```
/// use citymetrics_service_shared::{ProblemDetails, PROBLEM_CITY_NOT_FOUND};
/// use axum::http::StatusCode;
///
/// let problem = ProblemDetails::new(
///     PROBLEM_CITY_NOT_FOUND,
///     "City Not Found",
///     StatusCode::NOT_FOUND,
/// )
/// .with_detail("City 'Atlantis' not found in database")
/// .with_request_id("req-12345");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    /// URI reference identifying the problem type (relative).
    #[serde(rename = "type")]
    pub type_uri: String,

    /// Short, human-readable summary of the problem.
    pub title: String,

    /// HTTP status code for this problem.
    pub status: u16,

    /// Human-readable explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// URI reference identifying the specific occurrence (the request ID).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,

    /// Content type for this response (always "application/problem+json").
    pub content_type: String,
}

impl ProblemDetails {
    /// Create a new ProblemDetails with required fields.
    pub fn new(type_uri: impl Into<String>, title: impl Into<String>, status: StatusCode) -> Self {
        Self {
            type_uri: type_uri.into(),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            instance: None,
            content_type: "application/problem+json".to_string(),
        }
    }

    /// Add a detailed explanation of this specific problem occurrence.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Add the request identifier for tracing.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.instance = Some(request_id.into());
        self
    }

    /// Create a 422 problem for query parameters that are missing, malformed,
    /// or out of range. Raised before any query runs.
    pub fn validation_failed(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_VALIDATION_FAILED,
            "Validation Failed",
            StatusCode::UNPROCESSABLE_ENTITY,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    /// Create a 400 problem for a category outside the fixed set.
    pub fn invalid_category(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INVALID_CATEGORY,
            "Invalid Category",
            StatusCode::BAD_REQUEST,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    /// Create a 404 problem for a capital lookup that matched nothing.
    pub fn city_not_found(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_CITY_NOT_FOUND,
            "City Not Found",
            StatusCode::NOT_FOUND,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    /// Create a 404 problem for a listing, ranking, or search with no rows.
    pub fn no_results(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(PROBLEM_NO_RESULTS, "No Results", StatusCode::NOT_FOUND)
            .with_detail(detail)
            .with_request_id(request_id)
    }

    /// Create a 404 problem for a path no route handles.
    pub fn route_not_found(path: &str, request_id: impl Into<String>) -> Self {
        Self::new(PROBLEM_NOT_FOUND, "Not Found", StatusCode::NOT_FOUND)
            .with_detail(format!("No endpoint at '{}'", path))
            .with_request_id(request_id)
    }

    /// Create a 500 Internal Server Error problem.
    pub fn internal_error(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INTERNAL_ERROR,
            "Internal Error",
            StatusCode::INTERNAL_SERVER_ERROR,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }
}

impl std::fmt::Display for ProblemDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.title,
            self.detail.as_deref().unwrap_or("")
        )
    }
}

impl std::error::Error for ProblemDetails {}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut response = Json(&self).into_response();
        response.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderValue::from_static("application/problem+json"),
        );

        *response.status_mut() = status;
        response
    }
}

/// Convert library errors to ProblemDetails.
///
/// The `request_id` must be provided separately since library errors don't have it.
pub fn from_lib_error(error: &LibError, request_id: &str) -> ProblemDetails {
    match error {
        LibError::CityNotFound { .. } => {
            ProblemDetails::city_not_found(error.to_string(), request_id)
        }
        LibError::EmptyDataset | LibError::NoRankedCities | LibError::NoSearchMatches { .. } => {
            ProblemDetails::no_results(error.to_string(), request_id)
        }
        LibError::InvalidCategory { .. } => {
            ProblemDetails::invalid_category(error.to_string(), request_id)
        }
        LibError::DatabaseNotFound { path } => ProblemDetails::internal_error(
            format!("Database not available at {}", path.display()),
            request_id,
        ),
        _ => ProblemDetails::internal_error(error.to_string(), request_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problem_details_new() {
        let problem = ProblemDetails::new(
            PROBLEM_CITY_NOT_FOUND,
            "City Not Found",
            StatusCode::NOT_FOUND,
        );
        assert_eq!(problem.type_uri, PROBLEM_CITY_NOT_FOUND);
        assert_eq!(problem.title, "City Not Found");
        assert_eq!(problem.status, 404);
        assert_eq!(problem.content_type, "application/problem+json");
        assert!(problem.detail.is_none());
    }

    #[test]
    fn test_validation_failed_is_422() {
        let problem = ProblemDetails::validation_failed("limit too large", "req-123");
        assert_eq!(problem.status, 422);
        assert_eq!(problem.instance.as_deref(), Some("req-123"));
        assert_eq!(problem.detail.as_deref(), Some("limit too large"));
    }

    #[test]
    fn test_problem_details_serialization() {
        let problem = ProblemDetails::invalid_category("Invalid category", "req-test");
        let json = serde_json::to_string(&problem).unwrap();

        assert!(json.contains("\"type\":\"/problems/invalid-category\""));
        assert!(json.contains("\"title\":\"Invalid Category\""));
        assert!(json.contains("\"status\":400"));
        assert!(json.contains("\"detail\":\"Invalid category\""));
        assert!(json.contains("\"instance\":\"req-test\""));
    }

    #[test]
    fn test_into_response_sets_status_and_content_type() {
        let response = ProblemDetails::no_results("No cities found", "req-1").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get(axum::http::header::CONTENT_TYPE).unwrap(),
            "application/problem+json"
        );
    }

    #[test]
    fn test_from_lib_error_city_not_found() {
        let error = LibError::CityNotFound {
            name: "Atlantis".to_string(),
            country: None,
        };
        let problem = from_lib_error(&error, "req-lib");

        assert_eq!(problem.type_uri, PROBLEM_CITY_NOT_FOUND);
        assert_eq!(problem.status, 404);
        assert!(problem.detail.as_deref().unwrap().contains("Atlantis"));
    }

    #[test]
    fn test_from_lib_error_empty_results() {
        for error in [
            LibError::EmptyDataset,
            LibError::NoRankedCities,
            LibError::NoSearchMatches {
                query: "zz".to_string(),
            },
        ] {
            let problem = from_lib_error(&error, "req");
            assert_eq!(problem.status, 404, "{}", error);
            assert_eq!(problem.type_uri, PROBLEM_NO_RESULTS);
        }
    }

    #[test]
    fn test_from_lib_error_invalid_category() {
        let error = LibError::InvalidCategory {
            value: "food".to_string(),
        };
        let problem = from_lib_error(&error, "req");

        assert_eq!(problem.status, 400);
        let detail = problem.detail.unwrap();
        assert!(detail.contains("food"));
        assert!(detail.contains("cultural_exchange"));
    }

    #[test]
    fn test_from_lib_error_missing_database_is_internal() {
        let error = LibError::DatabaseNotFound {
            path: std::path::PathBuf::from("/data/travel_metrics.db"),
        };
        let problem = from_lib_error(&error, "req");

        assert_eq!(problem.status, 500);
        assert_eq!(problem.type_uri, PROBLEM_INTERNAL_ERROR);
        assert_eq!(
            problem.detail.as_deref(),
            Some("Database not available at /data/travel_metrics.db")
        );
    }

    #[test]
    fn test_from_lib_error_sqlite_is_internal() {
        let error = LibError::Sqlite(rusqlite::Error::InvalidQuery);
        let problem = from_lib_error(&error, "req");
        assert_eq!(problem.status, 500);
        assert_eq!(problem.type_uri, PROBLEM_INTERNAL_ERROR);
    }
}
