use std::time::Duration;

use tracing::{debug, info};

use crate::config::{LoaderConfig, RetryConfig};
use crate::errors::{LoaderError, Result};
use crate::retry::with_retry;

use super::{RawBindings, SparqlResponse, TripleStore, SPARQL_RESULTS_JSON};

/// Blocking SPARQL client for a single fixed endpoint.
///
/// Every query is retried with exponential backoff on transient failures.
/// Nothing is cached.
pub struct SparqlClient {
    agent: ureq::Agent,
    endpoint: String,
    user_agent: String,
    max_response_bytes: u64,
    retry: RetryConfig,
}

impl SparqlClient {
    /// Creates a client from the loader configuration.
    pub fn new(config: &LoaderConfig) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.http_timeout_secs)))
            .build()
            .into();

        Self {
            agent,
            endpoint: config.sparql_endpoint.clone(),
            user_agent: config.user_agent.clone(),
            max_response_bytes: config.max_response_bytes,
            retry: config.retry.clone(),
        }
    }

    /// Sends one request without retrying.
    fn send(&self, query: &str) -> std::result::Result<SparqlResponse, ureq::Error> {
        let mut response = self
            .agent
            .get(self.endpoint.as_str())
            .query("query", query)
            .query("format", SPARQL_RESULTS_JSON)
            .header("Accept", SPARQL_RESULTS_JSON)
            .header("User-Agent", self.user_agent.as_str())
            .call()?;

        response
            .body_mut()
            .with_config()
            .limit(self.max_response_bytes)
            .read_json::<SparqlResponse>()
    }
}

/// Client errors other than timeouts and rate limiting mean the query itself
/// is bad; repeating it will not help.
fn is_transient(err: &ureq::Error) -> bool {
    match err {
        ureq::Error::StatusCode(code) => *code >= 500 || *code == 408 || *code == 429,
        _ => true,
    }
}

impl TripleStore for SparqlClient {
    fn query(&self, query: &str) -> Result<RawBindings> {
        info!("Querying: {}", query);

        let response = with_retry(&self.retry, |_| self.send(query), is_transient).map_err(
            |e| LoaderError::Transport {
                message: e.to_string(),
                endpoint: self.endpoint.clone(),
            },
        )?;

        debug!(
            vars = ?response.head.vars,
            rows = response.results.bindings.len(),
            "query answered"
        );
        Ok(response.results.bindings)
    }
}
