//! Configuration for the video search service.
//!
//! All settings come from environment variables, read once at startup.

mod dependencies;

pub use dependencies::Dependencies;

use std::env;
use std::net::{Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

use crate::IndexingError;
use video_search_repository::opensearch::DEFAULT_INDEX_NAME;
use video_search_repository::RequestTimeouts;

/// Default OpenSearch URL.
const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// Default content store base URL.
const DEFAULT_SOURCE_API_URL: &str = "http://localhost:8000";

/// Default port of the HTTP query façade.
const DEFAULT_HTTP_PORT: u16 = 3001;

const DEFAULT_SYNC_INTERVAL_SECS: u64 = 30;
const DEFAULT_RETRY_INTERVAL_SECS: u64 = 15;
const DEFAULT_SOURCE_TIMEOUT_SECS: u64 = 30;
const DEFAULT_INDEX_WRITE_TIMEOUT_SECS: u64 = 30;
const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 5;

/// What startup does when the search index cannot be prepared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartupMode {
    /// Abort startup.
    FailFast,
    /// Retry every `retry_interval` until the index is ready.
    #[default]
    Retry,
    /// Start anyway; every sync cycle re-checks the index until it succeeds.
    Degraded,
}

impl StartupMode {
    /// Parse a startup mode.
    ///
    /// Valid values: "fail-fast", "retry" or "degraded" (case-insensitive).
    /// Anything else falls back to "retry".
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "fail-fast" | "failfast" | "fail_fast" => Self::FailFast,
            "retry" => Self::Retry,
            "degraded" => Self::Degraded,
            other => {
                warn!(value = other, "Invalid STARTUP_MODE, defaulting to 'retry'");
                Self::Retry
            }
        }
    }
}

/// Service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub opensearch_url: String,
    pub index_name: String,
    pub source_api_url: String,
    pub sync_interval: Duration,
    pub http_port: u16,
    pub startup_mode: StartupMode,
    pub retry_interval: Duration,
    pub source_timeout: Duration,
    pub index_write_timeout: Duration,
    pub query_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            opensearch_url: DEFAULT_OPENSEARCH_URL.to_string(),
            index_name: DEFAULT_INDEX_NAME.to_string(),
            source_api_url: DEFAULT_SOURCE_API_URL.to_string(),
            sync_interval: Duration::from_secs(DEFAULT_SYNC_INTERVAL_SECS),
            http_port: DEFAULT_HTTP_PORT,
            startup_mode: StartupMode::default(),
            retry_interval: Duration::from_secs(DEFAULT_RETRY_INTERVAL_SECS),
            source_timeout: Duration::from_secs(DEFAULT_SOURCE_TIMEOUT_SECS),
            index_write_timeout: Duration::from_secs(DEFAULT_INDEX_WRITE_TIMEOUT_SECS),
            query_timeout: Duration::from_secs(DEFAULT_QUERY_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OPENSEARCH_URL` (or `ELASTICSEARCH_HOST`): OpenSearch server URL (default: http://localhost:9200)
    /// - `INDEX_NAME`: Index name (default: "videos")
    /// - `SOURCE_API_URL`: Content store base URL (default: http://localhost:8000)
    /// - `SYNC_INTERVAL_SECS`: Seconds between sync cycles (default: 30)
    /// - `HTTP_PORT`: Port of the search API (default: 3001)
    /// - `STARTUP_MODE`: "fail-fast", "retry" or "degraded" (default: retry)
    /// - `OPENSEARCH_RETRY_INTERVAL_SECS`: Retry interval in seconds (default: 15)
    /// - `SOURCE_TIMEOUT_SECS`: Content store request timeout (default: 30)
    /// - `INDEX_WRITE_TIMEOUT_SECS`: Bulk upsert timeout (default: 30)
    /// - `QUERY_TIMEOUT_SECS`: Search request timeout (default: 5)
    pub fn from_env() -> Result<Self, IndexingError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, IndexingError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let opensearch_url = lookup("OPENSEARCH_URL")
            .or_else(|| lookup("ELASTICSEARCH_HOST"))
            .unwrap_or(defaults.opensearch_url);
        let index_name = lookup("INDEX_NAME").unwrap_or(defaults.index_name);
        let source_api_url = lookup("SOURCE_API_URL").unwrap_or(defaults.source_api_url);
        let startup_mode = lookup("STARTUP_MODE")
            .map(|raw| StartupMode::parse(&raw))
            .unwrap_or_default();

        let sync_interval = seconds(&lookup, "SYNC_INTERVAL_SECS", DEFAULT_SYNC_INTERVAL_SECS)?;
        if sync_interval.is_zero() {
            return Err(IndexingError::config("SYNC_INTERVAL_SECS must be greater than 0"));
        }

        Ok(Self {
            opensearch_url,
            index_name,
            source_api_url,
            sync_interval,
            http_port: parse_var(&lookup, "HTTP_PORT", DEFAULT_HTTP_PORT)?,
            startup_mode,
            retry_interval: seconds(
                &lookup,
                "OPENSEARCH_RETRY_INTERVAL_SECS",
                DEFAULT_RETRY_INTERVAL_SECS,
            )?,
            source_timeout: seconds(&lookup, "SOURCE_TIMEOUT_SECS", DEFAULT_SOURCE_TIMEOUT_SECS)?,
            index_write_timeout: seconds(
                &lookup,
                "INDEX_WRITE_TIMEOUT_SECS",
                DEFAULT_INDEX_WRITE_TIMEOUT_SECS,
            )?,
            query_timeout: seconds(&lookup, "QUERY_TIMEOUT_SECS", DEFAULT_QUERY_TIMEOUT_SECS)?,
        })
    }

    /// Address the HTTP server binds to.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.http_port))
    }

    /// Timeouts applied to OpenSearch requests.
    pub fn request_timeouts(&self) -> RequestTimeouts {
        RequestTimeouts::default()
            .with_write(self.index_write_timeout)
            .with_query(self.query_timeout)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, IndexingError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| IndexingError::config(format!("{} is not a valid number: '{}'", key, raw))),
    }
}

fn seconds<F>(lookup: &F, key: &str, default: u64) -> Result<Duration, IndexingError>
where
    F: Fn(&str) -> Option<String>,
{
    parse_var(lookup, key, default).map(Duration::from_secs)
}
