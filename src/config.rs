use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{LoaderError, Result};
use crate::scrape::DuplicateRowPolicy;
use crate::sink::SinkKind;

/// Public DBpedia SPARQL endpoint.
pub const DEFAULT_SPARQL_ENDPOINT: &str = "http://dbpedia.org/sparql";

/// Ontology class enumerated by default.
pub const DEFAULT_ENTITY_CLASS: &str = "http://dbpedia.org/ontology/Mountain";

/// Name of the directory created under the platform data dir.
pub const DATA_DIR_NAME: &str = "summit-loader";

/// Configuration for a loader run.
///
/// Constructed once at startup (defaults, then an optional JSON file, then
/// command-line overrides) and passed by reference everywhere after that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// SPARQL endpoint queried for triples.
    pub sparql_endpoint: String,
    /// Class URI whose instances are enumerated.
    pub entity_class: String,
    /// Maximum number of URIs fetched per page.
    pub page_size: usize,
    /// Retry behaviour for SPARQL queries.
    pub retry: RetryConfig,
    /// Global timeout applied to every HTTP request, in seconds.
    pub http_timeout_secs: u64,
    /// Largest response body accepted, in bytes.
    pub max_response_bytes: u64,
    /// User-Agent sent with every request.
    pub user_agent: String,
    /// How duplicated infobox rows are handled while scraping.
    pub duplicate_rows: DuplicateRowPolicy,
    /// Where resolved records go.
    pub sink: SinkConfig,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            sparql_endpoint: DEFAULT_SPARQL_ENDPOINT.to_string(),
            entity_class: DEFAULT_ENTITY_CLASS.to_string(),
            page_size: 100,
            retry: RetryConfig::default(),
            http_timeout_secs: 30,
            max_response_bytes: 64 * 1024 * 1024,
            user_agent: format!("summit-loader/{}", env!("CARGO_PKG_VERSION")),
            duplicate_rows: DuplicateRowPolicy::default(),
            sink: SinkConfig::default(),
        }
    }
}

/// Exponential backoff settings for the query client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Delay before the first retry, in milliseconds. Doubles on each retry.
    pub base_delay_ms: u64,
    /// Upper bound for a single delay, in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay_ms: 500,
            max_delay_ms: 8_000,
        }
    }
}

/// Sink selection and per-sink settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    /// Which sink receives records.
    pub kind: SinkKind,
    /// SQLite database file for the relational sink.
    pub sqlite_path: PathBuf,
    /// Program and arguments spawned by the subprocess sink.
    pub command: Vec<String>,
    /// Whether the log sink prints the raw triples of each record.
    pub log_raw_parsed: bool,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            kind: SinkKind::Log,
            sqlite_path: default_sqlite_path(),
            command: vec![
                "npx".to_string(),
                "ts-node".to_string(),
                "tools/load_mountains.ts".to_string(),
            ],
            log_raw_parsed: false,
        }
    }
}

/// Returns `<data dir>/summit-loader/mountains.db`, falling back to the
/// current directory when the platform has no data dir.
pub fn default_sqlite_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(DATA_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mountains.db")
}

/// Loads the configuration from a JSON file.
///
/// With no path the defaults are returned. Fields absent from the file keep
/// their default values.
pub fn load_config(path: Option<&Path>) -> Result<LoaderConfig> {
    let Some(path) = path else {
        return Ok(LoaderConfig::default());
    };

    let contents = fs::read_to_string(path).map_err(|e| LoaderError::Config {
        message: format!("failed to read config file '{}': {}", path.display(), e),
    })?;

    let config: LoaderConfig =
        serde_json::from_str(&contents).map_err(|e| LoaderError::Config {
            message: format!("failed to parse config file '{}': {}", path.display(), e),
        })?;

    config.validate()?;
    Ok(config)
}

impl LoaderConfig {
    /// Rejects settings that would make a run meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.sparql_endpoint.trim().is_empty() {
            return Err(LoaderError::Config {
                message: "sparql_endpoint must not be empty".to_string(),
            });
        }
        if self.page_size == 0 {
            return Err(LoaderError::Config {
                message: "page_size must be at least 1".to_string(),
            });
        }
        if self.retry.max_attempts == 0 {
            return Err(LoaderError::Config {
                message: "retry.max_attempts must be at least 1".to_string(),
            });
        }
        if self.sink.kind == SinkKind::Subprocess && self.sink.command.is_empty() {
            return Err(LoaderError::Config {
                message: "the subprocess sink needs a command".to_string(),
            });
        }
        Ok(())
    }
}
