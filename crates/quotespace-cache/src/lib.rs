// Key-value storage layer
// Everything quotespace persists goes through the KeyValueStore trait

pub mod memory;
pub mod sqlite;
pub mod store;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use store::{KeyValueStore, StoreError, StoreResult};
