use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;

use crate::error::{FetchError, Result, SkyfetchError};
use crate::pipeline::config::FetchConfig;

/// Downloads a whole remote file into memory.
pub trait Fetcher {
    fn get(&self, url: &str) -> std::result::Result<Vec<u8>, FetchError>;
}

/// Blocking HTTP GET with no retry.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config)?,
        })
    }
}

impl Fetcher for HttpFetcher {
    fn get(&self, url: &str) -> std::result::Result<Vec<u8>, FetchError> {
        let response = self.client.get(url).send()?.error_for_status()?;
        let body = response.bytes()?;
        debug!(url, bytes = body.len(), "Downloaded file");
        Ok(body.to_vec())
    }
}

/// Build the shared blocking client. Without a configured timeout requests
/// may wait forever; reqwest's own 30 s default is switched off.
pub(crate) fn build_client(config: &FetchConfig) -> Result<Client> {
    let timeout = config.timeout_secs.map(Duration::from_secs);
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(timeout)
        .build()
        .map_err(|e| SkyfetchError::Config(format!("Failed to create HTTP client: {e}")))
}

/// Display name of a download: the final `/`-separated segment of the URL.
pub fn file_name_from_url(url: &str) -> String {
    url.rsplit('/').next().unwrap_or(url).to_string()
}
