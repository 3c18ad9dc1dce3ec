// Daily quote service: ties preference, daily cache, favorites and fetching together
use std::sync::Arc;

use quotespace_cache::KeyValueStore;
use tracing::{debug, info};

use crate::{
    clock::Clock, daily::DailyCache, favorites::FavoritesRegistry, models::Quote,
    prefs::PreferenceStore, providers::QuoteFetcher, Result,
};

/// What the caller gets back when asking for today's quote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyQuote {
    pub quote: Quote,
    pub is_favorite: bool,
    /// True when the quote came from today's cache rather than a fetch
    pub from_cache: bool,
}

/// Cache-first access to the quote of the day
///
/// The three stores share one key-value store handle but never talk to each
/// other; all the sequencing lives here.
pub struct DailyQuoteService {
    daily: DailyCache,
    favorites: FavoritesRegistry,
    prefs: PreferenceStore,
    fetcher: Arc<dyn QuoteFetcher>,
    default_category: String,
}

impl DailyQuoteService {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        fetcher: Arc<dyn QuoteFetcher>,
        default_category: impl Into<String>,
    ) -> Self {
        Self {
            daily: DailyCache::new(store.clone(), clock),
            favorites: FavoritesRegistry::new(store.clone()),
            prefs: PreferenceStore::new(store),
            fetcher,
            default_category: default_category.into(),
        }
    }

    pub fn favorites(&self) -> &FavoritesRegistry {
        &self.favorites
    }

    pub fn daily(&self) -> &DailyCache {
        &self.daily
    }

    pub fn prefs(&self) -> &PreferenceStore {
        &self.prefs
    }

    /// The selected category, or the configured default
    pub async fn current_category(&self) -> String {
        self.prefs
            .get_selected_category()
            .await
            .unwrap_or_else(|| self.default_category.clone())
    }

    pub async fn select_category(&self, category: &str) -> Result<()> {
        info!("Selecting category {}", category);
        self.prefs.set_selected_category(category).await
    }

    /// Today's quote for `category`, fetching one only if today's is missing
    ///
    /// Fetch failures come back as errors; no stale quote is substituted.
    pub async fn load_daily(&self, category: Option<&str>) -> Result<DailyQuote> {
        if let Some(quote) = self.daily.get_stored_daily(category).await {
            debug!("Cache hit for {:?}", category);
            return Ok(self.annotate(quote, true).await);
        }

        debug!("No quote stored today for {:?}, fetching", category);
        self.fetch_and_store(category).await
    }

    /// Fetch a new quote and make it today's quote, cached or not
    pub async fn refresh(&self, category: Option<&str>) -> Result<DailyQuote> {
        self.fetch_and_store(category).await
    }

    /// Flip favorite status; returns whether the quote is now a favorite
    pub async fn toggle_favorite(&self, quote: &Quote) -> Result<bool> {
        if self.favorites.is_favorite(&quote.id).await {
            self.favorites.remove_favorite(&quote.id).await?;
            Ok(false)
        } else {
            self.favorites.add_favorite(quote).await?;
            Ok(true)
        }
    }

    async fn fetch_and_store(&self, category: Option<&str>) -> Result<DailyQuote> {
        let quote = self.fetcher.fetch_quote(category).await?;
        self.daily.set_daily(&quote, category).await?;
        Ok(self.annotate(quote, false).await)
    }

    async fn annotate(&self, quote: Quote, from_cache: bool) -> DailyQuote {
        let is_favorite = self.favorites.is_favorite(&quote.id).await;
        DailyQuote {
            quote,
            is_favorite,
            from_cache,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{clock::FixedClock, Error};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use quotespace_cache::MemoryStore;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Hands out numbered quotes, or fails when told to
    struct CountingFetcher {
        calls: AtomicU32,
        fail: bool,
    }

    impl CountingFetcher {
        fn ok() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicU32::new(0),
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicU32::new(0),
                fail: true,
            })
        }
    }

    #[async_trait]
    impl QuoteFetcher for CountingFetcher {
        async fn fetch_quote(&self, category: Option<&str>) -> Result<Quote> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail {
                return Err(Error::FetchError("ZenQuotes error: 503".into()));
            }
            let quote = Quote::new(format!("quote #{}", n), "Counter");
            Ok(match category {
                Some(c) => quote.with_category(c),
                None => quote,
            })
        }
    }

    fn service(store: Arc<MemoryStore>, fetcher: Arc<CountingFetcher>, d: u32) -> DailyQuoteService {
        let clock = Arc::new(FixedClock(NaiveDate::from_ymd_opt(2024, 6, d).unwrap()));
        DailyQuoteService::new(store, clock, fetcher, "inspirational")
    }

    #[tokio::test]
    async fn test_current_category_defaults_then_follows_selection() {
        let svc = service(Arc::new(MemoryStore::new()), CountingFetcher::ok(), 1);
        assert_eq!(svc.current_category().await, "inspirational");

        svc.select_category("love").await.unwrap();
        assert_eq!(svc.current_category().await, "love");
    }

    #[tokio::test]
    async fn test_load_daily_fetches_once_per_day() {
        let store = Arc::new(MemoryStore::new());
        let fetcher = CountingFetcher::ok();
        let svc = service(store.clone(), fetcher.clone(), 1);

        let first = svc.load_daily(Some("life")).await.unwrap();
        assert!(!first.from_cache);
        let second = svc.load_daily(Some("Life")).await.unwrap();
        assert!(second.from_cache);
        assert_eq!(first.quote, second.quote);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);

        // Next day the cached quote is stale
        let tomorrow = service(store, fetcher.clone(), 2);
        let third = tomorrow.load_daily(Some("life")).await.unwrap();
        assert_ne!(third.quote, first.quote);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_refresh_overwrites_today() {
        let fetcher = CountingFetcher::ok();
        let svc = service(Arc::new(MemoryStore::new()), fetcher.clone(), 1);

        let first = svc.load_daily(None).await.unwrap();
        let refreshed = svc.refresh(None).await.unwrap();
        assert_ne!(first.quote, refreshed.quote);

        let again = svc.load_daily(None).await.unwrap();
        assert!(again.from_cache);
        assert_eq!(again.quote, refreshed.quote);
    }

    #[tokio::test]
    async fn test_fetch_failure_surfaces() {
        let svc = service(Arc::new(MemoryStore::new()), CountingFetcher::failing(), 1);

        let err = svc.load_daily(Some("love")).await.unwrap_err();
        assert!(matches!(err, Error::FetchError(_)));
        assert_eq!(svc.daily().get_stored_daily(Some("love")).await, None);
    }

    #[tokio::test]
    async fn test_toggle_favorite_and_membership_flag() {
        let svc = service(Arc::new(MemoryStore::new()), CountingFetcher::ok(), 1);
        let today = svc.load_daily(None).await.unwrap();
        assert!(!today.is_favorite);

        assert!(svc.toggle_favorite(&today.quote).await.unwrap());
        assert!(svc.load_daily(None).await.unwrap().is_favorite);

        assert!(!svc.toggle_favorite(&today.quote).await.unwrap());
        assert!(svc.favorites().get_favorites().await.is_empty());
    }
}
