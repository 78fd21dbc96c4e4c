use log::debug;
use reqwest::blocking::Client;
use reqwest::Url;

use super::Fetcher;
use crate::config::HttpConfig;
use crate::error::{Result, ScrapeError};

/// Plain HTTP GET with the configured user agent and timeout
pub struct RequestFetcher {
    client: Client,
}

impl RequestFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client })
    }
}

impl Fetcher for RequestFetcher {
    fn fetch(&self, url: &Url) -> Result<String> {
        debug!("GET {}", url);
        let response = self.client.get(url.clone()).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // decoded with the charset announced in Content-Type, UTF-8 otherwise
        Ok(response.text()?)
    }
}
