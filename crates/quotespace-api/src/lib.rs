// HTTP clients for the upstream quote providers
pub mod ninjas;
pub mod retry;
pub mod zenquotes;

// Re-export common types
pub use ninjas::{NinjasClient, NinjasError, NinjasQuote};
pub use retry::{RetryConfig, Retryable};
pub use zenquotes::{ZenQuote, ZenQuotesClient, ZenQuotesError};

pub(crate) const USER_AGENT: &str = concat!("Quotespace/", env!("CARGO_PKG_VERSION"));

/// Both providers wrap their payload in an array, but not always
#[derive(serde::Deserialize)]
#[serde(untagged)]
pub(crate) enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub(crate) fn into_first(self) -> Option<T> {
        match self {
            OneOrMany::Many(items) => items.into_iter().next(),
            OneOrMany::One(item) => Some(item),
        }
    }
}
