use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::retry::{is_retryable_status, with_retry, RetryConfig, Retryable};
use crate::OneOrMany;

pub const ZENQUOTES_TODAY_URL: &str = "https://zenquotes.io/api/today";

#[derive(Error, Debug)]
pub enum ZenQuotesError {
    #[error("ZenQuotes error: {0}")]
    RequestFailed(u16),

    #[error("ZenQuotes returned no quote")]
    Empty,

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),
}

impl Retryable for ZenQuotesError {
    fn is_retryable(&self) -> bool {
        match self {
            ZenQuotesError::RequestFailed(status) => reqwest::StatusCode::from_u16(*status)
                .map(is_retryable_status)
                .unwrap_or(false),
            ZenQuotesError::NetworkError(_) => true,
            ZenQuotesError::Empty | ZenQuotesError::ParseError(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ZenQuotesError>;

/// ZenQuotes uses single-letter field names: q = quote, a = author
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ZenQuote {
    pub q: String,
    #[serde(default)]
    pub a: Option<String>,
}

pub struct ZenQuotesClient {
    client: reqwest::Client,
    today_url: String,
    retry_config: RetryConfig,
}

impl ZenQuotesClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::with_url(ZENQUOTES_TODAY_URL.to_string(), timeout)
    }

    pub fn with_url(today_url: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(crate::USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            today_url,
            retry_config: RetryConfig::default(),
        })
    }

    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    /// Today's quote - the same for everyone, no key and no categories
    pub async fn today(&self) -> Result<ZenQuote> {
        with_retry(&self.retry_config, || async {
            debug!("Requesting ZenQuotes quote of the day");
            let response = self.client.get(&self.today_url).send().await?;
            let status = response.status();

            if !status.is_success() {
                return Err(ZenQuotesError::RequestFailed(status.as_u16()));
            }

            let body = response.text().await?;
            parse_today(&body)
        })
        .await
    }
}

pub fn parse_today(body: &str) -> Result<ZenQuote> {
    let parsed: OneOrMany<ZenQuote> = serde_json::from_str(body)?;
    parsed.into_first().ok_or(ZenQuotesError::Empty)
}
