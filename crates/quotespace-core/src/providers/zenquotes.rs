// ZenQuotes source - category-agnostic last resort
use async_trait::async_trait;
use quotespace_api::{ZenQuote, ZenQuotesClient};

use crate::{
    models::Quote,
    providers::{QuoteSource, SourceError},
};

pub struct ZenQuotesSource {
    client: ZenQuotesClient,
}

impl ZenQuotesSource {
    pub fn new(client: ZenQuotesClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl QuoteSource for ZenQuotesSource {
    fn name(&self) -> &'static str {
        "ZenQuotes"
    }

    fn supports_categories(&self) -> bool {
        false
    }

    async fn fetch(&self, _category: Option<&str>) -> Result<Quote, SourceError> {
        self.client
            .today()
            .await
            .map(zen_to_quote)
            .map_err(|e| SourceError::Unavailable(e.to_string()))
    }
}

fn zen_to_quote(raw: ZenQuote) -> Quote {
    let author = raw.a.unwrap_or_default();

    Quote {
        id: format!("{}-{}", author, raw.q),
        text: raw.q,
        author: if author.is_empty() {
            "Unknown".to_string()
        } else {
            author
        },
        category: None,
    }
}
