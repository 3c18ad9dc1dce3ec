use std::sync::Arc;

use quotespace_cache::KeyValueStore;

use crate::{
    keys,
    storage::{read_json, write_json},
    Result,
};

/// The category the user picked last
pub struct PreferenceStore {
    store: Arc<dyn KeyValueStore>,
}

impl PreferenceStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// `None` if nothing was picked yet or the stored value isn't a JSON string
    pub async fn get_selected_category(&self) -> Option<String> {
        read_json(self.store.as_ref(), keys::SELECTED_CATEGORY).await
    }

    pub async fn set_selected_category(&self, category: &str) -> Result<()> {
        write_json(self.store.as_ref(), keys::SELECTED_CATEGORY, category).await
    }
}
