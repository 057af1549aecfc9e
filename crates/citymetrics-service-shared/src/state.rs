//! Application state for the HTTP service.
//!
//! The state only carries the [`CityStore`] handle. No connection is held
//! between requests: each query opens and closes its own connection on a
//! blocking worker thread.

use std::sync::Arc;

use citymetrics_lib::{CityStore, Error as LibError, Result as LibResult};

/// Shared application state for all axum handlers.
///
/// This struct is cheaply cloneable (using `Arc` internally) and should be
/// shared via axum's `State` extractor.
///
/// # Example
///
/// ```ignore
/// use axum::{Router, routing::get, extract::State};
/// use citymetrics_lib::CityStore;
/// use citymetrics_service_shared::AppState;
///
/// async fn handler(State(state): State<AppState>) {
///     let count = state.run(|store| store.count()).await;
/// }
///
/// let state = AppState::new(CityStore::new("travel_metrics.db"));
/// let app = Router::new()
///     .route("/health", get(handler))
///     .with_state(state);
/// ```
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: CityStore,
}

impl AppState {
    /// Create application state around a store.
    ///
    /// The database file is not required to exist yet; a missing file is
    /// reported per request and by the health check.
    pub fn new(store: CityStore) -> Self {
        if !store.path().exists() {
            tracing::warn!(
                path = %store.path().display(),
                "database file not found, requests will fail until it exists"
            );
        }

        Self {
            inner: Arc::new(AppStateInner { store }),
        }
    }

    /// Access the store handle.
    pub fn store(&self) -> &CityStore {
        &self.inner.store
    }

    /// Run a blocking store operation on tokio's blocking pool.
    ///
    /// A panicking or cancelled task surfaces as [`LibError::QueryAborted`].
    pub async fn run<T, F>(&self, op: F) -> LibResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&CityStore) -> LibResult<T> + Send + 'static,
    {
        let state = self.clone();
        tokio::task::spawn_blocking(move || op(state.store()))
            .await
            .map_err(|e| LibError::QueryAborted {
                message: e.to_string(),
            })?
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("database", &self.inner.store.path())
            .finish()
    }
}
