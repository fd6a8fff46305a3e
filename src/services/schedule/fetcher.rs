use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use thiserror::Error;

use crate::models::schedule::{FeedParseError, ScheduleFeed};

/// Failure modes of the schedule fetch collaborator. The engine treats all of
/// them identically (retain old snapshot, mark it stale); the split exists
/// for logging and tests.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("schedule URL must use http or https: {0}")]
    InvalidUrl(String),
    #[error("network error fetching schedule: {0}")]
    Network(reqwest::Error),
    #[error("schedule fetch timed out")]
    Timeout,
    #[error("schedule endpoint returned HTTP {0}")]
    Status(StatusCode),
    #[error("schedule response too large ({0} bytes)")]
    TooLarge(usize),
    #[error("malformed schedule payload: {0}")]
    Parse(String),
}

impl From<FeedParseError> for FetchError {
    fn from(err: FeedParseError) -> Self {
        FetchError::Parse(err.to_string())
    }
}

/// The abstract "fetch schedule" operation injected into the engine.
/// Implementations return the raw feed document; conversion to a snapshot
/// (and its error handling) happens at the engine boundary.
#[cfg_attr(test, mockall::automock)]
pub trait ScheduleFetcher: Send + Sync {
    fn fetch(&self) -> Result<ScheduleFeed, FetchError>;
}

/// HTTP implementation over the published notifications JSON.
pub struct HttpScheduleFetcher {
    client: Client,
    url: String,
    max_response_bytes: usize,
}

impl HttpScheduleFetcher {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let url = url.into();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(FetchError::InvalidUrl(url));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FetchError::Network)?;

        Ok(Self {
            client,
            url,
            max_response_bytes: 5 * 1024 * 1024,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn fetch_once(&self) -> Result<ScheduleFeed, FetchError> {
        let response = self.client.get(&self.url).send().map_err(|err| {
            if err.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::Network(err)
            }
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status(status));
        }

        if let Some(content_length) = response.content_length() {
            if content_length as usize > self.max_response_bytes {
                return Err(FetchError::TooLarge(content_length as usize));
            }
        }

        let bytes = response.bytes().map_err(|err| {
            if err.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::Network(err)
            }
        })?;

        if bytes.len() > self.max_response_bytes {
            return Err(FetchError::TooLarge(bytes.len()));
        }

        serde_json::from_slice(&bytes).map_err(|err| FetchError::Parse(err.to_string()))
    }
}

impl ScheduleFetcher for HttpScheduleFetcher {
    fn fetch(&self) -> Result<ScheduleFeed, FetchError> {
        self.fetch_once()
    }
}
