//! Async key-value persistence for the marketplace client.
//!
//! Provides the storage seam the cart persists through, plus two backends
//! and a typed JSON wrapper.
//!
//! # Example
//!
//! ```rust,ignore
//! use market_kv::{JsonStore, MemoryStore, store_key};
//!
//! let store = JsonStore::new(MemoryStore::new());
//! let key = store_key!("@GoMarketplace", "cart-items");
//!
//! store.set_json(&key, &items).await?;
//! let items: Option<Vec<Item>> = store.get_json(&key).await?;
//! ```

mod error;
mod file;
mod kv;
mod memory;

pub use error::StoreError;
pub use file::FileStore;
pub use kv::{JsonStore, KeyValueStore, StoreResult};
pub use memory::MemoryStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FileStore, JsonStore, KeyValueStore, MemoryStore, StoreError};
}
