use std::sync::Arc;

use quotespace_cache::KeyValueStore;
use tracing::debug;

use crate::{
    clock::Clock,
    keys,
    models::{DailyRecord, Quote},
    storage::{read_json, write_json},
    Result,
};

/// One "quote of the day" per category
///
/// Each category gets its own key, so switching categories back and forth
/// reuses whatever was already fetched today instead of refetching.
pub struct DailyCache {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl DailyCache {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Today's quote for `category`, if one was stored today
    ///
    /// A record from an earlier day is left where it is; the caller fetches
    /// a replacement and `set_daily` overwrites it.
    pub async fn get_stored_daily(&self, category: Option<&str>) -> Option<Quote> {
        let key = keys::daily_key(category);
        let record: DailyRecord = read_json(self.store.as_ref(), &key).await?;

        let today = self.clock.today();
        if record.date != today {
            debug!("Daily quote at {} is from {}, not {}", key, record.date, today);
            return None;
        }

        Some(record.quote)
    }

    /// Store `quote` as today's quote for `category`, replacing any previous one
    pub async fn set_daily(&self, quote: &Quote, category: Option<&str>) -> Result<()> {
        let record = DailyRecord {
            date: self.clock.today(),
            category: category.map(str::to_string),
            quote: quote.clone(),
        };

        write_json(self.store.as_ref(), &keys::daily_key(category), &record).await
    }
}
