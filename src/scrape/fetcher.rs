use std::time::Duration;

use crate::config::LoaderConfig;
use crate::errors::{LoaderError, Result};

/// Retrieves the HTML body of a page.
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> Result<String>;
}

/// Blocking HTTP fetcher. Redirects are followed; failures are not retried.
pub struct HttpPageFetcher {
    agent: ureq::Agent,
    user_agent: String,
    max_response_bytes: u64,
}

impl HttpPageFetcher {
    pub fn new(config: &LoaderConfig) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.http_timeout_secs)))
            .build()
            .into();

        Self {
            agent,
            user_agent: config.user_agent.clone(),
            max_response_bytes: config.max_response_bytes,
        }
    }
}

impl PageFetcher for HttpPageFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        let to_fetch_error = |e: ureq::Error| LoaderError::Fetch {
            message: e.to_string(),
            url: url.to_string(),
        };

        let mut response = self
            .agent
            .get(url)
            .header("User-Agent", self.user_agent.as_str())
            .call()
            .map_err(to_fetch_error)?;

        response
            .body_mut()
            .with_config()
            .limit(self.max_response_bytes)
            .read_to_string()
            .map_err(to_fetch_error)
    }
}
