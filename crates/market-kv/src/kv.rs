//! Key-value store abstraction with typed JSON access.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::StoreError;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Asynchronous string key-value store.
///
/// This is the whole persistence surface the cart needs: one record is read
/// at startup and rewritten after every mutation. Implementations must be
/// safe to share between tasks.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Get the value stored under `key`, or `None` if it doesn't exist.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> StoreResult<()>;
}

#[async_trait]
impl<S> KeyValueStore for Arc<S>
where
    S: KeyValueStore + ?Sized,
{
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value).await
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        (**self).delete(key).await
    }
}

/// Typed wrapper that (de)serializes values as JSON.
///
/// A stored value that does not parse as `T` surfaces as
/// [`StoreError::Serialization`], distinct from failures of the store
/// itself.
///
/// # Example
///
/// ```rust,ignore
/// let store = JsonStore::new(MemoryStore::new());
/// store.set_json("@GoMarketplace:cart-items", &cart).await?;
/// let cart: Option<Cart> = store.get_json("@GoMarketplace:cart-items").await?;
/// ```
#[derive(Debug, Clone)]
pub struct JsonStore<S> {
    inner: S,
}

impl<S: KeyValueStore> JsonStore<S> {
    /// Wrap a raw store.
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    /// Get and deserialize a value.
    ///
    /// Returns `None` if the key doesn't exist.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>> {
        match self.inner.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Serialize and store a value.
    pub async fn set_json<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
    ) -> StoreResult<()> {
        let raw = serde_json::to_string(value)?;
        self.inner.set(key, &raw).await
    }
}

/// Build a namespaced store key.
///
/// # Example
///
/// ```rust
/// let key = market_kv::store_key!("@GoMarketplace", "cart-items");
/// assert_eq!(key, "@GoMarketplace:cart-items");
/// ```
#[macro_export]
macro_rules! store_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Entry {
        name: String,
        count: u32,
    }

    #[test]
    fn test_store_key_single_part() {
        assert_eq!(store_key!("cart", "items"), "cart:items");
    }

    #[test]
    fn test_store_key_multiple_parts() {
        assert_eq!(store_key!("cart", "user", 42), "cart:user:42");
    }

    #[tokio::test]
    async fn test_json_store_missing_key() {
        let store = JsonStore::new(MemoryStore::new());
        let value: Option<Entry> = store.get_json("missing").await.unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_json_store_set_then_get() {
        let store = JsonStore::new(MemoryStore::new());
        let entry = Entry {
            name: "apples".to_string(),
            count: 3,
        };

        store.set_json("entry", &entry).await.unwrap();

        let loaded: Option<Entry> = store.get_json("entry").await.unwrap();
        assert_eq!(loaded, Some(entry));
    }

    #[tokio::test]
    async fn test_json_store_rejects_malformed_value() {
        let raw = MemoryStore::new();
        raw.set("entry", "{not json").await.unwrap();

        let store = JsonStore::new(raw);
        let result = store.get_json::<Entry>("entry").await;
        assert!(matches!(result, Err(StoreError::Serialization(_))));
    }

    #[tokio::test]
    async fn test_arc_store_shares_state() {
        let shared = Arc::new(MemoryStore::new());
        let handle = Arc::clone(&shared);

        handle.set("k", "v").await.unwrap();
        assert_eq!(shared.get("k").await.unwrap().as_deref(), Some("v"));
    }
}
