//! Blocking HTTP transport shared by the price and rate providers.
//!
//! Connection failures and timeouts are retried with exponential backoff up to a
//! fixed budget. A response that arrived is never retried: a non-success status is
//! returned to the caller as `FetchError::HttpStatus`.

use super::provider::FetchError;
use crate::config::HttpConfig;
use log::debug;
use std::time::Duration;

/// One HTTP client for the whole process.
#[derive(Debug)]
pub struct Transport {
    client: reqwest::blocking::Client,
    max_retries: u32,
    base_delay: Duration,
}

impl Transport {
    pub fn new(config: &HttpConfig) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| FetchError::NetworkUnreachable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            max_retries: config.max_retries,
            base_delay: config.retry_base_delay(),
        })
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// GET `url` and return the body of a successful response as text.
    pub fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let resp = self.get_with_retry(url)?;
        resp.text().map_err(|e| {
            FetchError::ResponseFormatChanged(format!("failed to read body from {url}: {e}"))
        })
    }

    fn get_with_retry(&self, url: &str) -> Result<reqwest::blocking::Response, FetchError> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self
                    .base_delay
                    .saturating_mul(2u32.saturating_pow(attempt - 1));
                debug!("retry {attempt}/{} for {url} in {delay:?}", self.max_retries);
                std::thread::sleep(delay);
            }

            match self.client.get(url).send() {
                Ok(resp) => {
                    let status = resp.status();
                    if !status.is_success() {
                        return Err(FetchError::HttpStatus {
                            status: status.as_u16(),
                            url: url.to_string(),
                        });
                    }
                    return Ok(resp);
                }
                Err(e) => {
                    if e.is_connect() || e.is_timeout() {
                        last_error = Some(FetchError::NetworkUnreachable(e.to_string()));
                        continue;
                    }
                    return Err(FetchError::NetworkUnreachable(e.to_string()));
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| FetchError::NetworkUnreachable("max retries exceeded".into())))
    }
}
