//! Service configuration and CORS policy.
//!
//! # Environment Variables
//!
//! - `CITYMETRICS_DB_PATH` - Path to the SQLite database (default: `travel_metrics.db`)
//! - `SERVICE_PORT` - HTTP port (default: 8000)
//! - `CORS_ORIGINS` - Comma-separated allowed origins; `*` mirrors any origin
//! - `DB_BUSY_TIMEOUT_MS` - SQLite busy timeout per connection (default: 5000)

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use axum::http::HeaderValue;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use citymetrics_lib::{CityStore, DEFAULT_BUSY_TIMEOUT};

/// Origins allowed when `CORS_ORIGINS` is unset.
pub const DEFAULT_CORS_ORIGINS: [&str; 3] = [
    "http://localhost",
    "http://localhost:3000",
    "https://calmcations-frontend.vercel.app",
];

/// Runtime configuration for the HTTP service.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub db_path: PathBuf,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub busy_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("travel_metrics.db"),
            port: 8000,
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }
}

impl ServiceConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// Unparseable numeric values fall back to their defaults with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let db_path = lookup("CITYMETRICS_DB_PATH")
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);

        let port = parse_or_default(lookup("SERVICE_PORT"), "SERVICE_PORT", defaults.port);

        let cors_origins = lookup("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or(defaults.cors_origins);

        let busy_timeout = lookup("DB_BUSY_TIMEOUT_MS")
            .map(|raw| {
                Duration::from_millis(parse_or_default(
                    Some(raw),
                    "DB_BUSY_TIMEOUT_MS",
                    defaults.busy_timeout.as_millis() as u64,
                ))
            })
            .unwrap_or(defaults.busy_timeout);

        Self {
            db_path,
            port,
            cors_origins,
            busy_timeout,
        }
    }

    /// Store handle configured with this database path and busy timeout.
    pub fn store(&self) -> CityStore {
        CityStore::new(&self.db_path).with_busy_timeout(self.busy_timeout)
    }

    /// Address to bind on all interfaces.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    /// CORS layer allowing the configured origins with any method and header.
    ///
    /// Credentials are allowed, so methods and headers mirror the preflight
    /// request instead of answering with `*`.
    pub fn cors_layer(&self) -> CorsLayer {
        let origin = if self.cors_origins.iter().any(|o| o == "*") {
            AllowOrigin::mirror_request()
        } else {
            let origins: Vec<HeaderValue> = self
                .cors_origins
                .iter()
                .filter_map(|o| match o.parse() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                        None
                    }
                })
                .collect();
            AllowOrigin::list(origins)
        };

        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(AllowMethods::mirror_request())
            .allow_headers(AllowHeaders::mirror_request())
            .allow_credentials(true)
    }
}

fn parse_or_default<T>(raw: Option<String>, key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    match raw {
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key = key, value = %value, "invalid value, using default");
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> ServiceConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServiceConfig::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.port, 8000);
        assert_eq!(config.db_path, PathBuf::from("travel_metrics.db"));
        assert_eq!(config.cors_origins.len(), 3);
        assert_eq!(config.busy_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("CITYMETRICS_DB_PATH", "/data/metrics.db"),
            ("SERVICE_PORT", "9090"),
            ("CORS_ORIGINS", "https://a.example, https://b.example,,"),
            ("DB_BUSY_TIMEOUT_MS", "250"),
        ]);

        assert_eq!(config.db_path, PathBuf::from("/data/metrics.db"));
        assert_eq!(config.port, 9090);
        assert_eq!(
            config.cors_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(config.busy_timeout, Duration::from_millis(250));
        assert_eq!(config.store().path(), PathBuf::from("/data/metrics.db"));
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let config = config_from(&[("SERVICE_PORT", "http"), ("DB_BUSY_TIMEOUT_MS", "-1")]);
        assert_eq!(config.port, 8000);
        assert_eq!(config.busy_timeout, DEFAULT_BUSY_TIMEOUT);
    }

    #[test]
    fn test_socket_addr_binds_all_interfaces() {
        let config = config_from(&[("SERVICE_PORT", "8123")]);
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8123");
    }

    #[test]
    fn test_cors_layer_accepts_wildcard_with_credentials() {
        let config = config_from(&[("CORS_ORIGINS", "*")]);
        // Building must not panic even though credentials are allowed.
        let _layer = config.cors_layer();
    }
}
