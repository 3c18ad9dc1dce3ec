// API Ninjas source - bridges the HTTP client with the QuoteSource trait
use async_trait::async_trait;
use quotespace_api::{NinjasClient, NinjasError, NinjasQuote};

use crate::{
    models::Quote,
    providers::{QuoteSource, SourceError},
};

pub struct NinjasSource {
    client: NinjasClient,
}

impl NinjasSource {
    pub fn new(client: NinjasClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl QuoteSource for NinjasSource {
    fn name(&self) -> &'static str {
        "API Ninjas"
    }

    fn supports_categories(&self) -> bool {
        true
    }

    async fn fetch(&self, category: Option<&str>) -> Result<Quote, SourceError> {
        match self.client.random_quote(category).await {
            Ok(Some(quote)) => Ok(ninjas_to_quote(quote)),
            Ok(None) => Err(SourceError::Transient("API Ninjas returned no quotes".into())),
            Err(e) => Err(classify(e)),
        }
    }
}

/// 400 means "bad category, try another"; any other refusal means the key
/// or the service is the problem, so there's no point asking again.
fn classify(err: NinjasError) -> SourceError {
    match err {
        NinjasError::InvalidCategory(category) => SourceError::UnknownCategory(category),
        e @ NinjasError::RequestFailed { .. } => SourceError::Unavailable(e.to_string()),
        e @ (NinjasError::NetworkError(_) | NinjasError::ParseError(_)) => {
            SourceError::Transient(e.to_string())
        }
    }
}

/// Convert the API Ninjas payload to our Quote model
fn ninjas_to_quote(raw: NinjasQuote) -> Quote {
    let author = raw.author.unwrap_or_default();

    Quote {
        id: format!("{}-{}", author, raw.quote),
        text: raw.quote,
        author: if author.is_empty() {
            "Unknown".to_string()
        } else {
            author
        },
        category: raw.category,
    }
}
