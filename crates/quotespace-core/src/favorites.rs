use std::sync::Arc;

use quotespace_cache::KeyValueStore;
use tracing::debug;

use crate::{
    keys,
    models::Quote,
    storage::{read_json, write_json},
    Result,
};

/// User-curated list of quotes, newest first, unique by id
///
/// Every operation reads the whole list and writes the whole list back.
/// That's fine for a hand-curated list, but it is not transactional: two
/// callers interleaving an add and a remove can lose one of the updates
/// (the last full-list write wins). Nothing here serializes callers.
pub struct FavoritesRegistry {
    store: Arc<dyn KeyValueStore>,
}

impl FavoritesRegistry {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// All favorites, most recently added first
    pub async fn get_favorites(&self) -> Vec<Quote> {
        read_json(self.store.as_ref(), keys::FAVORITES)
            .await
            .unwrap_or_default()
    }

    /// Prepend `quote` unless a favorite with the same id already exists
    pub async fn add_favorite(&self, quote: &Quote) -> Result<()> {
        let mut list = self.get_favorites().await;

        if list.iter().any(|q| q.id == quote.id) {
            debug!("{} is already a favorite", quote.id);
            return Ok(());
        }

        list.insert(0, quote.clone());
        self.save(&list).await
    }

    /// Drop every favorite with this id. Unknown ids are fine.
    pub async fn remove_favorite(&self, id: &str) -> Result<()> {
        let mut list = self.get_favorites().await;
        list.retain(|q| q.id != id);
        self.save(&list).await
    }

    pub async fn is_favorite(&self, id: &str) -> bool {
        self.get_favorites().await.iter().any(|q| q.id == id)
    }

    pub async fn clear_favorites(&self) -> Result<()> {
        self.save(&[]).await
    }

    pub async fn find_favorite(&self, id: &str) -> Option<Quote> {
        self.get_favorites().await.into_iter().find(|q| q.id == id)
    }

    /// Favorites whose text or author contains `query`, ignoring case
    ///
    /// A blank query returns everything.
    pub async fn search_favorites(&self, query: &str) -> Vec<Quote> {
        let favorites = self.get_favorites().await;
        let needle = query.trim().to_lowercase();

        if needle.is_empty() {
            return favorites;
        }

        favorites.into_iter().filter(|q| q.matches(&needle)).collect()
    }

    async fn save(&self, list: &[Quote]) -> Result<()> {
        write_json(self.store.as_ref(), keys::FAVORITES, list).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::mock::MockStore;
    use quotespace_cache::{MemoryStore, StoreError};

    fn registry() -> FavoritesRegistry {
        FavoritesRegistry::new(Arc::new(MemoryStore::new()))
    }

    fn ids(list: &[Quote]) -> Vec<&str> {
        list.iter().map(|q| q.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_starts_empty() {
        assert!(registry().get_favorites().await.is_empty());
    }

    #[tokio::test]
    async fn test_newest_first() {
        let favorites = registry();
        let q1 = Quote::new("first", "A");
        let q2 = Quote::new("second", "B");

        favorites.add_favorite(&q1).await.unwrap();
        favorites.add_favorite(&q2).await.unwrap();

        assert_eq!(favorites.get_favorites().await, vec![q2, q1]);
    }

    #[tokio::test]
    async fn test_add_is_idempotent() {
        let favorites = registry();
        let quote = Quote::new("once", "A");

        favorites.add_favorite(&quote).await.unwrap();
        favorites.add_favorite(&Quote::new("other", "B")).await.unwrap();
        favorites.add_favorite(&quote).await.unwrap();

        let list = favorites.get_favorites().await;
        assert_eq!(ids(&list), vec!["B-other", "A-once"]);
    }

    #[tokio::test]
    async fn test_remove_and_membership() {
        let favorites = registry();
        let quote = Quote::new("keep me", "A");

        assert!(!favorites.is_favorite(&quote.id).await);
        favorites.add_favorite(&quote).await.unwrap();
        assert!(favorites.is_favorite(&quote.id).await);

        favorites.remove_favorite(&quote.id).await.unwrap();
        assert!(!favorites.is_favorite(&quote.id).await);
    }

    #[tokio::test]
    async fn test_remove_unknown_id_is_noop() {
        let favorites = registry();
        let quote = Quote::new("stay", "A");
        favorites.add_favorite(&quote).await.unwrap();

        favorites.remove_favorite("nobody-nothing").await.unwrap();

        assert_eq!(favorites.get_favorites().await, vec![quote]);
    }

    #[tokio::test]
    async fn test_clear() {
        let favorites = registry();
        favorites.add_favorite(&Quote::new("a", "A")).await.unwrap();
        favorites.add_favorite(&Quote::new("b", "B")).await.unwrap();

        favorites.clear_favorites().await.unwrap();

        assert!(favorites.get_favorites().await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_list_is_empty() {
        let store = Arc::new(MemoryStore::new());
        let favorites = FavoritesRegistry::new(store.clone());

        store.set("@quotespace/favorites", "not json at all").await.unwrap();
        assert!(favorites.get_favorites().await.is_empty());

        // Valid JSON, wrong shape
        store.set("@quotespace/favorites", r#"{"id":"x"}"#).await.unwrap();
        assert!(favorites.get_favorites().await.is_empty());

        // Adding on top of garbage starts a fresh list
        favorites.add_favorite(&Quote::new("fresh", "A")).await.unwrap();
        assert_eq!(favorites.get_favorites().await.len(), 1);
    }

    #[tokio::test]
    async fn test_search_matches_text_or_author() {
        let favorites = registry();
        favorites
            .add_favorite(&Quote::new("The only way out is through.", "Robert Frost"))
            .await
            .unwrap();
        favorites
            .add_favorite(&Quote::new("Stay hungry, stay foolish.", "Steve Jobs"))
            .await
            .unwrap();

        let by_text = favorites.search_favorites("  HUNGRY ").await;
        assert_eq!(ids(&by_text), vec!["Steve Jobs-Stay hungry, stay foolish."]);

        let by_author = favorites.search_favorites("frost").await;
        assert_eq!(by_author.len(), 1);

        assert_eq!(favorites.search_favorites("").await.len(), 2);
        assert!(favorites.search_favorites("nothing like this").await.is_empty());
    }

    #[tokio::test]
    async fn test_find_favorite() {
        let favorites = registry();
        let quote = Quote::new("found", "A");
        favorites.add_favorite(&quote).await.unwrap();

        assert_eq!(favorites.find_favorite("A-found").await, Some(quote));
        assert_eq!(favorites.find_favorite("A-lost").await, None);
    }

    #[tokio::test]
    async fn test_write_failure_propagates() {
        let mut store = MockStore::new();
        store.expect_get().returning(|_| Ok(None));
        store
            .expect_set()
            .returning(|_, _| Err(StoreError::LockPoisoned));

        let favorites = FavoritesRegistry::new(Arc::new(store));
        assert!(favorites.add_favorite(&Quote::new("a", "A")).await.is_err());
        assert!(favorites.clear_favorites().await.is_err());
    }
}
