//! City travel metrics HTTP service.
//!
//! Read-only JSON API over the `city_metrics` table: lookups by capital,
//! listings, rankings overall and per category, and substring search.
//!
//! # Endpoints
//!
//! - `GET /` - Route directory and category names
//! - `GET /cities` - Every city ordered by capital
//! - `GET /city/{name}` - Full record for one capital (`country` filter optional)
//! - `GET /city/{name}/scores` - Score-only view of one capital
//! - `GET /top-cities` - Top cities by overall score (`limit`, 1-50)
//! - `GET /top-cities/{category}` - Top cities by one category score
//! - `GET /search` - Substring search over capital and country (`query`, `limit`)
//! - `GET /health` - Database connectivity check
//! - `GET /health/live` - Liveness probe
//! - `GET /metrics` - Prometheus metrics endpoint

use axum::{
    Json, Router,
    extract::{Path, State},
    http::Uri,
    routing::get,
};
use tracing::{error, info};

use citymetrics_lib::{CityMetrics, Error as LibError, RankedCity, ScoreCard, SearchHit};
use citymetrics_service_shared::{
    ApiIndex, ApiResult, AppState, CategoryRanking, CityList, CityParams, LimitParams,
    MetricsConfig, MetricsLayer, ProblemDetails, RequestId, SearchParams, ServiceConfig,
    ValidatedQuery, failure_outcome, from_lib_error, health_check, health_live, metrics_handler,
    parse_category, record_city_query, record_rows_returned,
};

/// Build the service router.
///
/// The metrics route is mounted at `metrics.path` unless metrics are
/// disabled. [`MetricsLayer`] wraps everything, including the fallback, so
/// every response carries an `X-Request-ID`.
pub fn router(state: AppState, service: &ServiceConfig, metrics: &MetricsConfig) -> Router {
    let mut app = Router::new()
        .route("/", get(root))
        .route("/cities", get(list_cities))
        .route("/city/{name}", get(city))
        .route("/city/{name}/scores", get(city_scores))
        .route("/top-cities", get(top_cities))
        .route("/top-cities/{category}", get(top_cities_by_category))
        .route("/search", get(search))
        .route("/health", get(health_check))
        .route("/health/live", get(health_live));

    if metrics.enabled {
        app = app.route(&metrics.path, get(metrics_handler));
    }

    app.fallback(route_not_found)
        .layer(service.cors_layer())
        .layer(MetricsLayer)
        .with_state(state)
}

/// Record a failed query and convert it to a problem.
///
/// Expected misses (no rows, unknown names) log at info; anything else is an
/// error.
fn query_failed(endpoint: &'static str, err: &LibError, request_id: &RequestId) -> ProblemDetails {
    let outcome = failure_outcome(err);
    record_city_query(endpoint, outcome);

    if outcome == "error" {
        error!(endpoint, error = %err, "query failed");
    } else {
        info!(endpoint, outcome, reason = %err, "query returned no result");
    }

    from_lib_error(err, request_id.as_str())
}

fn query_succeeded(endpoint: &'static str, rows: usize) {
    record_city_query(endpoint, "ok");
    record_rows_returned(endpoint, rows);
}

async fn root() -> Json<ApiIndex> {
    Json(ApiIndex::default())
}

/// Handle `GET /cities`.
async fn list_cities(State(state): State<AppState>, request_id: RequestId) -> ApiResult<CityList> {
    let cities = state
        .run(|store| store.list_cities())
        .await
        .map_err(|e| query_failed("cities", &e, &request_id))?;

    query_succeeded("cities", cities.len());
    info!(count = cities.len(), "listed cities");

    Ok(Json(CityList::new(cities)))
}

/// Handle `GET /city/{name}`.
async fn city(
    State(state): State<AppState>,
    Path(name): Path<String>,
    request_id: RequestId,
    ValidatedQuery(params): ValidatedQuery<CityParams>,
) -> ApiResult<CityMetrics> {
    let country = params.country().map(str::to_string);
    info!(city = %name, country = ?country, "looking up city");

    let record = state
        .run(move |store| store.city(&name, country.as_deref()))
        .await
        .map_err(|e| query_failed("city", &e, &request_id))?;

    query_succeeded("city", 1);
    Ok(Json(record))
}

/// Handle `GET /city/{name}/scores`.
async fn city_scores(
    State(state): State<AppState>,
    Path(name): Path<String>,
    request_id: RequestId,
    ValidatedQuery(params): ValidatedQuery<CityParams>,
) -> ApiResult<ScoreCard> {
    let country = params.country().map(str::to_string);

    let scores = state
        .run(move |store| store.city_scores(&name, country.as_deref()))
        .await
        .map_err(|e| query_failed("city_scores", &e, &request_id))?;

    query_succeeded("city_scores", 1);
    Ok(Json(scores))
}

/// Handle `GET /top-cities`.
async fn top_cities(
    State(state): State<AppState>,
    request_id: RequestId,
    ValidatedQuery(params): ValidatedQuery<LimitParams>,
) -> ApiResult<Vec<RankedCity>> {
    let limit = params.limit;

    let ranked = state
        .run(move |store| store.top_cities(limit))
        .await
        .map_err(|e| query_failed("top_cities", &e, &request_id))?;

    query_succeeded("top_cities", ranked.len());
    info!(limit, returned = ranked.len(), "ranked cities");

    Ok(Json(ranked))
}

/// Handle `GET /top-cities/{category}`.
///
/// `limit` is validated by the extractor before the category is parsed, so a
/// request that is wrong on both counts gets the 422.
async fn top_cities_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
    request_id: RequestId,
    ValidatedQuery(params): ValidatedQuery<LimitParams>,
) -> ApiResult<CategoryRanking> {
    let category = parse_category(&category, request_id.as_str()).map_err(|problem| {
        record_city_query("top_cities_by_category", "invalid");
        *problem
    })?;
    let limit = params.limit;

    let top_cities = state
        .run(move |store| store.top_cities_by_category(category, limit))
        .await
        .map_err(|e| query_failed("top_cities_by_category", &e, &request_id))?;

    query_succeeded("top_cities_by_category", top_cities.len());
    info!(%category, limit, returned = top_cities.len(), "ranked cities by category");

    Ok(Json(CategoryRanking {
        category,
        top_cities,
    }))
}

/// Handle `GET /search`.
async fn search(
    State(state): State<AppState>,
    request_id: RequestId,
    ValidatedQuery(params): ValidatedQuery<SearchParams>,
) -> ApiResult<Vec<SearchHit>> {
    let SearchParams { query, limit } = params;
    info!(query = %query, limit, "searching cities");

    let hits = state
        .run(move |store| store.search(&query, limit))
        .await
        .map_err(|e| query_failed("search", &e, &request_id))?;

    query_succeeded("search", hits.len());
    Ok(Json(hits))
}

async fn route_not_found(uri: Uri, request_id: RequestId) -> ProblemDetails {
    ProblemDetails::route_not_found(uri.path(), request_id.as_str())
}
