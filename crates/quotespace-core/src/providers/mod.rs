// Quote retrieval: upstream sources and the fallback chain over them
pub mod ninjas;
pub mod zenquotes;

use std::time::Duration;

use async_trait::async_trait;
use quotespace_api::{NinjasClient, ZenQuotesClient};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{config::Config, models::Quote, Error, Result};

pub use ninjas::NinjasSource;
pub use zenquotes::ZenQuotesSource;

/// How a single source attempt failed, which decides what to try next
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The source doesn't know this category; try the next one
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// Network hiccup or an empty/garbled answer; try the next category
    #[error("{0}")]
    Transient(String),

    /// The source is refusing us (bad key, outage); move to the next source
    #[error("{0}")]
    Unavailable(String),
}

/// One upstream quote provider
///
/// Each provider gets its own implementation, so new providers can be added
/// without touching the fallback logic.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether `fetch` honours the category argument
    fn supports_categories(&self) -> bool;

    async fn fetch(&self, category: Option<&str>) -> std::result::Result<Quote, SourceError>;
}

/// Anything that can hand us a quote for a category
///
/// The daily-quote service only depends on this, so tests can swap in a
/// canned fetcher.
#[async_trait]
pub trait QuoteFetcher: Send + Sync {
    async fn fetch_quote(&self, category: Option<&str>) -> Result<Quote>;
}

/// Tries sources in order, walking a chain of categories on each
///
/// For a category-aware source the chain is: the requested category (or the
/// default), then the configured fallback categories, then "any category".
/// A source that reports itself unavailable is abandoned for the next one.
pub struct FallbackQuoteFetcher {
    sources: Vec<Box<dyn QuoteSource>>,
    default_category: String,
    fallback_categories: Vec<String>,
}

impl FallbackQuoteFetcher {
    pub fn new(default_category: impl Into<String>, fallback_categories: Vec<String>) -> Self {
        Self {
            sources: Vec::new(),
            default_category: default_category.into(),
            fallback_categories,
        }
    }

    /// Wire up the real providers
    ///
    /// API Ninjas is only used when a key is configured; ZenQuotes is always
    /// the last resort.
    pub fn from_config(config: &Config) -> Result<Self> {
        let timeout = Duration::from_secs(config.api.request_timeout_secs);
        let retry = config.retry.to_retry_config();

        let mut fetcher = Self::new(
            config.quotes.default_category.clone(),
            config.quotes.fallback_categories.clone(),
        );

        match config.api.ninjas_api_key.as_deref().filter(|k| !k.is_empty()) {
            Some(key) => {
                let client =
                    NinjasClient::with_base_url(key.to_string(), config.api.ninjas_url.clone(), timeout)
                        .map_err(|e| {
                            Error::ConfigError(format!("Failed to build API Ninjas client: {}", e))
                        })?
                        .with_retry_config(retry.clone());
                fetcher.add_source(Box::new(NinjasSource::new(client)));
            }
            None => debug!("No API Ninjas key configured, using ZenQuotes only"),
        }

        let zen = ZenQuotesClient::with_url(config.api.zenquotes_url.clone(), timeout)
            .map_err(|e| Error::ConfigError(format!("Failed to build ZenQuotes client: {}", e)))?
            .with_retry_config(retry);
        fetcher.add_source(Box::new(ZenQuotesSource::new(zen)));

        Ok(fetcher)
    }

    pub fn add_source(&mut self, source: Box<dyn QuoteSource>) {
        self.sources.push(source);
    }

    /// Categories to try, in order; `None` means "any category"
    pub fn category_chain(&self, requested: Option<&str>) -> Vec<Option<String>> {
        let first = requested
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(self.default_category.as_str());

        let mut chain: Vec<Option<String>> = Vec::new();
        for category in std::iter::once(first).chain(self.fallback_categories.iter().map(String::as_str)) {
            let already = chain
                .iter()
                .flatten()
                .any(|c| c.eq_ignore_ascii_case(category));
            if !already && !category.is_empty() {
                chain.push(Some(category.to_string()));
            }
        }
        chain.push(None);

        chain
    }
}

#[async_trait]
impl QuoteFetcher for FallbackQuoteFetcher {
    async fn fetch_quote(&self, category: Option<&str>) -> Result<Quote> {
        let chain = self.category_chain(category);
        let mut last_error: Option<SourceError> = None;

        for source in &self.sources {
            if !source.supports_categories() {
                match source.fetch(None).await {
                    Ok(quote) => {
                        info!("Got quote from {}", source.name());
                        return Ok(quote);
                    }
                    Err(e) => {
                        warn!("{} failed: {}", source.name(), e);
                        last_error = Some(e);
                    }
                }
                continue;
            }

            for attempt in &chain {
                match source.fetch(attempt.as_deref()).await {
                    Ok(quote) => {
                        info!(
                            "Got quote from {} (category: {})",
                            source.name(),
                            attempt.as_deref().unwrap_or("any")
                        );
                        return Ok(quote);
                    }
                    Err(SourceError::Unavailable(msg)) => {
                        warn!("Giving up on {}: {}", source.name(), msg);
                        last_error = Some(SourceError::Unavailable(msg));
                        break;
                    }
                    Err(e) => {
                        debug!("{} failed for {:?}: {}", source.name(), attempt, e);
                        last_error = Some(e);
                    }
                }
            }
        }

        Err(Error::FetchError(
            last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no quote sources configured".to_string()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Source that replays scripted answers and records what it was asked
    struct ScriptedSource {
        name: &'static str,
        categories: bool,
        answers: Mutex<VecDeque<std::result::Result<Quote, SourceError>>>,
        calls: std::sync::Arc<Mutex<Vec<Option<String>>>>,
    }

    impl ScriptedSource {
        fn new(
            name: &'static str,
            categories: bool,
            answers: Vec<std::result::Result<Quote, SourceError>>,
        ) -> Self {
            Self {
                name,
                categories,
                answers: Mutex::new(answers.into()),
                calls: Default::default(),
            }
        }
    }

    #[async_trait]
    impl QuoteSource for ScriptedSource {
        fn name(&self) -> &'static str {
            self.name
        }

        fn supports_categories(&self) -> bool {
            self.categories
        }

        async fn fetch(&self, category: Option<&str>) -> std::result::Result<Quote, SourceError> {
            self.calls.lock().unwrap().push(category.map(str::to_string));
            self.answers
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(SourceError::Transient("script exhausted".into())))
        }
    }

    fn fetcher() -> FallbackQuoteFetcher {
        FallbackQuoteFetcher::new("inspirational", vec!["inspirational".to_string()])
    }

    #[test]
    fn test_category_chain() {
        let f = fetcher();
        assert_eq!(
            f.category_chain(Some("love")),
            vec![Some("love".to_string()), Some("inspirational".to_string()), None]
        );
        // Default already equals the fallback, no point asking twice
        assert_eq!(f.category_chain(None), vec![Some("inspirational".to_string()), None]);
        assert_eq!(f.category_chain(Some("  ")), f.category_chain(None));
    }

    #[tokio::test]
    async fn test_unknown_category_walks_the_chain() {
        let ninjas = ScriptedSource::new(
            "ninjas",
            true,
            vec![
                Err(SourceError::UnknownCategory("wisdom".into())),
                Ok(Quote::new("B", "A")),
            ],
        );
        let calls = ninjas.calls.clone();

        let mut f = fetcher();
        f.add_source(Box::new(ninjas));

        let quote = f.fetch_quote(Some("wisdom")).await.unwrap();
        assert_eq!(quote.id, "A-B");
        assert_eq!(
            *calls.lock().unwrap(),
            vec![Some("wisdom".to_string()), Some("inspirational".to_string())]
        );
    }

    #[tokio::test]
    async fn test_unavailable_source_falls_through() {
        let ninjas = ScriptedSource::new(
            "ninjas",
            true,
            vec![Err(SourceError::Unavailable("401".into()))],
        );
        let ninjas_calls = ninjas.calls.clone();
        let zen = ScriptedSource::new("zen", false, vec![Ok(Quote::new("Zen", "Z"))]);
        let zen_calls = zen.calls.clone();

        let mut f = fetcher();
        f.add_source(Box::new(ninjas));
        f.add_source(Box::new(zen));

        let quote = f.fetch_quote(Some("love")).await.unwrap();
        assert_eq!(quote.author, "Z");
        assert_eq!(ninjas_calls.lock().unwrap().len(), 1);
        assert_eq!(*zen_calls.lock().unwrap(), vec![None]);
    }

    #[tokio::test]
    async fn test_transient_errors_try_every_category() {
        let ninjas = ScriptedSource::new("ninjas", true, vec![]);
        let calls = ninjas.calls.clone();

        let mut f = fetcher();
        f.add_source(Box::new(ninjas));

        let err = f.fetch_quote(Some("love")).await.unwrap_err();
        assert!(matches!(err, Error::FetchError(_)));
        assert_eq!(calls.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_exhausted_sources_report_last_error() {
        let mut f = fetcher();
        f.add_source(Box::new(ScriptedSource::new(
            "zen",
            false,
            vec![Err(SourceError::Unavailable("ZenQuotes error: 503".into()))],
        )));

        let err = f.fetch_quote(None).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch quote: ZenQuotes error: 503");
    }

    #[tokio::test]
    async fn test_no_sources() {
        let err = fetcher().fetch_quote(None).await.unwrap_err();
        assert!(matches!(err, Error::FetchError(_)));
    }

    #[test]
    fn test_from_config_without_key_uses_zenquotes_only() {
        let config = Config::default();
        let f = FallbackQuoteFetcher::from_config(&config).unwrap();
        let names: Vec<_> = f.sources.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["ZenQuotes"]);
    }

    #[test]
    fn test_from_config_with_key_prefers_ninjas() {
        let mut config = Config::default();
        config.api.ninjas_api_key = Some("secret".to_string());
        let f = FallbackQuoteFetcher::from_config(&config).unwrap();
        let names: Vec<_> = f.sources.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["API Ninjas", "ZenQuotes"]);
    }
}
