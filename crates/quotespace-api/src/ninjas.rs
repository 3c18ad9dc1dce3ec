use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::retry::{is_retryable_status, with_retry, RetryConfig, Retryable};
use crate::OneOrMany;

pub const NINJAS_API_BASE: &str = "https://api.api-ninjas.com/v1/quotes";

#[derive(Error, Debug)]
pub enum NinjasError {
    /// API Ninjas answers 400 for categories it doesn't know
    #[error("Unknown quote category: {0}")]
    InvalidCategory(String),

    #[error("API Ninjas request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),
}

impl Retryable for NinjasError {
    fn is_retryable(&self) -> bool {
        match self {
            NinjasError::RequestFailed { status, .. } => reqwest::StatusCode::from_u16(*status)
                .map(is_retryable_status)
                .unwrap_or(false),
            NinjasError::NetworkError(_) => true,
            NinjasError::InvalidCategory(_) | NinjasError::ParseError(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, NinjasError>;

/// Quote as API Ninjas returns it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NinjasQuote {
    pub quote: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

pub struct NinjasClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    retry_config: RetryConfig,
}

impl NinjasClient {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self> {
        Self::with_base_url(api_key, NINJAS_API_BASE.to_string(), timeout)
    }

    /// Point the client at a different endpoint (proxies, test servers)
    pub fn with_base_url(api_key: String, base_url: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(crate::USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url,
            retry_config: RetryConfig::default(),
        })
    }

    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    /// Fetch one random quote, optionally restricted to a category
    ///
    /// A blank category means "any category". `Ok(None)` means the API
    /// answered successfully but had nothing to give.
    pub async fn random_quote(&self, category: Option<&str>) -> Result<Option<NinjasQuote>> {
        let category = category.map(str::trim).filter(|c| !c.is_empty());

        with_retry(&self.retry_config, || async {
            let mut request = self
                .client
                .get(&self.base_url)
                .header("X-Api-Key", &self.api_key)
                .header(reqwest::header::ACCEPT, "application/json");

            if let Some(cat) = category {
                request = request.query(&[("category", cat)]);
            }

            debug!("Requesting API Ninjas quote (category: {:?})", category);
            let response = request.send().await?;
            let status = response.status();

            if status == reqwest::StatusCode::BAD_REQUEST {
                return Err(NinjasError::InvalidCategory(
                    category.unwrap_or("any").to_string(),
                ));
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(NinjasError::RequestFailed {
                    status: status.as_u16(),
                    body,
                });
            }

            let body = response.text().await?;
            Ok(parse_quotes(&body)?)
        })
        .await
    }
}

/// The endpoint returns an array, but a bare object has been seen too
pub fn parse_quotes(body: &str) -> std::result::Result<Option<NinjasQuote>, serde_json::Error> {
    let parsed: OneOrMany<NinjasQuote> = serde_json::from_str(body)?;
    Ok(parsed.into_first())
}
