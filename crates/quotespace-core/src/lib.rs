// Core business logic: daily caching, favorites, preferences and quote retrieval
pub mod clock;
pub mod config;
pub mod daily;
pub mod error;
pub mod favorites;
pub mod keys;
pub mod models;
pub mod prefs;
pub mod providers;
pub mod quote_of_day;
mod storage;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use daily::DailyCache;
pub use error::Error;
pub use favorites::FavoritesRegistry;
pub use models::{DailyRecord, Quote};
pub use prefs::PreferenceStore;
pub use providers::{FallbackQuoteFetcher, QuoteFetcher, QuoteSource, SourceError};
pub use quote_of_day::{DailyQuote, DailyQuoteService};

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
