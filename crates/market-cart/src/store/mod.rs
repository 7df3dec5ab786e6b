//! The cart store: authoritative in-memory cart with write-through
//! persistence.
//!
//! Every mutation runs under one lock: it edits a copy of the current cart,
//! publishes the copy to subscribers and queues it for the writer task
//! before the lock is released. The writer is the only task that touches
//! the persisted record, so writes land in mutation order and the record
//! always converges on the latest in-memory cart.

mod writer;

use std::sync::Arc;

use market_kv::{JsonStore, KeyValueStore, StoreError};
use tokio::sync::{broadcast, mpsc, oneshot, watch, Mutex};
use tokio::task::JoinHandle;

use crate::cart::{Adjustment, Cart, NewItem};
use crate::config::CartConfig;
use crate::error::{CartError, WriteError};
use crate::ids::ProductId;
use crate::money::Currency;

pub use writer::PendingWrite;
use writer::{WriteJob, WriterReport};

/// Capacity of the write-error broadcast channel.
const ERROR_CHANNEL_CAPACITY: usize = 16;

/// What the store found in persistent storage when it was opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hydration {
    /// No record was stored; the cart starts empty.
    Empty,
    /// The record was loaded.
    Restored { items: usize },
    /// The record could not be parsed and was ignored; the cart starts
    /// empty and the record is overwritten by the next mutation.
    Discarded { reason: String },
}

struct State {
    cart: Arc<Cart>,
    revision: u64,
}

/// Owner of the cart.
///
/// # Example
///
/// ```rust,ignore
/// let store = CartStore::open(FileStore::open("cart.json"), &CartConfig::default()).await?;
///
/// store.add_to_cart(NewItem::new("42", "Mug", "https://img/mug.png", price)).await?;
/// store.increment(&ProductId::new("42")).await?.await?;
///
/// let cart = store.products();
/// ```
pub struct CartStore {
    currency: Currency,
    hydration: Hydration,
    state: Mutex<State>,
    published: watch::Sender<Arc<Cart>>,
    queue: mpsc::UnboundedSender<WriteJob>,
    errors: broadcast::Sender<WriteError>,
    completed: watch::Receiver<u64>,
    writer: JoinHandle<()>,
}

impl CartStore {
    /// Load the persisted cart and start the writer.
    ///
    /// A missing record gives an empty cart. A malformed one is discarded
    /// with a warning. Failing to read the store at all is an error.
    pub async fn open<S>(store: S, config: &CartConfig) -> Result<Self, CartError>
    where
        S: KeyValueStore + 'static,
    {
        let key = config.storage_key.clone();
        let store = JsonStore::new(store);
        let (cart, hydration) = hydrate(&store, &key).await?;

        tracing::info!(key = %key, hydration = ?hydration, "cart store opened");

        let cart = Arc::new(cart);
        let (published, _) = watch::channel(Arc::clone(&cart));
        let (queue, jobs) = mpsc::unbounded_channel();
        let (errors, _) = broadcast::channel(ERROR_CHANNEL_CAPACITY);
        let (completed_tx, completed) = watch::channel(0);

        let report = WriterReport {
            errors: errors.clone(),
            completed: completed_tx,
        };
        let writer = tokio::spawn(writer::run(store, key, jobs, report));

        Ok(Self {
            currency: config.currency,
            hydration,
            state: Mutex::new(State { cart, revision: 0 }),
            published,
            queue,
            errors,
            completed,
            writer,
        })
    }

    /// Add one unit of `item`, appending it if it is not in the cart yet.
    pub async fn add_to_cart(&self, item: NewItem) -> Result<PendingWrite, CartError> {
        let id = item.id.clone();
        self.mutate("add", &id, |cart| cart.add(item)).await
    }

    /// Add one unit of an item already in the cart. Unknown ids are ignored.
    pub async fn increment(&self, id: &ProductId) -> Result<PendingWrite, CartError> {
        self.mutate("increment", id, |cart| cart.increment(id)).await
    }

    /// Remove one unit of an item, dropping the line at zero. Unknown ids
    /// are ignored.
    pub async fn decrement(&self, id: &ProductId) -> Result<PendingWrite, CartError> {
        self.mutate("decrement", id, |cart| Ok(cart.decrement(id))).await
    }

    async fn mutate<F>(
        &self,
        op: &'static str,
        id: &ProductId,
        f: F,
    ) -> Result<PendingWrite, CartError>
    where
        F: FnOnce(&mut Cart) -> Result<Adjustment, CartError>,
    {
        let mut state = self.state.lock().await;

        let mut next = Cart::clone(&state.cart);
        let adjustment = f(&mut next)?;
        if !adjustment.is_change() {
            tracing::debug!(op, id = %id, "cart unchanged, item not found");
            return Ok(PendingWrite::noop());
        }

        state.revision += 1;
        let revision = state.revision;
        let cart = Arc::new(next);
        state.cart = Arc::clone(&cart);
        self.published.send_replace(Arc::clone(&cart));

        let (done, rx) = oneshot::channel();
        self.queue
            .send(WriteJob {
                revision,
                cart,
                done,
            })
            .map_err(|_| CartError::WriterClosed)?;

        tracing::debug!(op, id = %id, revision, ?adjustment, "cart updated");
        Ok(PendingWrite::queued(revision, rx))
    }

    /// Snapshot of the current cart.
    pub fn products(&self) -> Arc<Cart> {
        self.published.borrow().clone()
    }

    /// Watch the cart. The receiver sees every published snapshot's latest
    /// value.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Cart>> {
        self.published.subscribe()
    }

    /// Receive every write failure from now on.
    pub fn write_errors(&self) -> broadcast::Receiver<WriteError> {
        self.errors.subscribe()
    }

    /// Wait until every write queued so far has finished.
    ///
    /// Failures are not reported here; see [`PendingWrite`] and
    /// [`write_errors`](Self::write_errors).
    pub async fn flush(&self) -> Result<(), CartError> {
        let target = self.state.lock().await.revision;
        let mut completed = self.completed.clone();
        let finished = completed.wait_for(|done| *done >= target).await.is_ok();
        if finished {
            Ok(())
        } else {
            Err(CartError::WriterClosed)
        }
    }

    /// Finish queued writes and stop the writer.
    pub async fn close(self) -> Result<(), CartError> {
        let Self { queue, writer, .. } = self;
        drop(queue);
        writer.await.map_err(|_| CartError::WriterClosed)
    }

    /// Latest revision; bumped by every mutation that changed the cart.
    pub async fn revision(&self) -> u64 {
        self.state.lock().await.revision
    }

    /// What was loaded at open.
    pub fn hydration(&self) -> &Hydration {
        &self.hydration
    }

    /// Currency cart prices are in.
    pub fn currency(&self) -> Currency {
        self.currency
    }
}

async fn hydrate<S: KeyValueStore>(
    store: &JsonStore<S>,
    key: &str,
) -> Result<(Cart, Hydration), CartError> {
    match store.get_json::<Cart>(key).await {
        Ok(None) => Ok((Cart::new(), Hydration::Empty)),
        Ok(Some(cart)) => {
            let items = cart.len();
            Ok((cart, Hydration::Restored { items }))
        }
        Err(StoreError::Serialization(e)) => {
            tracing::warn!(key = %key, error = %e, "discarding malformed cart record");
            Ok((
                Cart::new(),
                Hydration::Discarded {
                    reason: e.to_string(),
                },
            ))
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Price;
    use market_kv::MemoryStore;

    fn mug() -> NewItem {
        NewItem::new("42", "Mug", "https://img/mug.png", Price::from_cents(1050))
    }

    #[tokio::test]
    async fn test_open_empty() {
        let store = CartStore::open(MemoryStore::new(), &CartConfig::default())
            .await
            .unwrap();

        assert_eq!(store.hydration(), &Hydration::Empty);
        assert!(store.products().is_empty());
        assert_eq!(store.revision().await, 0);
    }

    #[tokio::test]
    async fn test_noop_does_not_bump_revision() {
        let store = CartStore::open(MemoryStore::new(), &CartConfig::default())
            .await
            .unwrap();

        let write = store.increment(&ProductId::new("ghost")).await.unwrap();
        assert!(write.is_noop());
        assert_eq!(write.revision(), None);
        write.await.unwrap();

        let write = store.decrement(&ProductId::new("ghost")).await.unwrap();
        assert!(write.is_noop());
        assert_eq!(store.revision().await, 0);
    }

    #[tokio::test]
    async fn test_mutation_replaces_snapshot() {
        let store = CartStore::open(MemoryStore::new(), &CartConfig::default())
            .await
            .unwrap();
        let before = store.products();

        let write = store.add_to_cart(mug()).await.unwrap();
        assert_eq!(write.revision(), Some(1));

        let after = store.products();
        assert!(!Arc::ptr_eq(&before, &after));
        assert!(before.is_empty());
        assert_eq!(after.len(), 1);
    }

    #[tokio::test]
    async fn test_rejected_increment_leaves_cart_untouched() {
        let raw = format!(
            r#"[{{"id":"42","title":"Mug","image_url":"u","price":1,"quantity":{}}}]"#,
            crate::cart::MAX_QUANTITY_PER_ITEM
        );
        let config = CartConfig::default();
        let kv = MemoryStore::with_entry(config.storage_key.clone(), raw);
        let store = CartStore::open(kv, &config).await.unwrap();

        let result = store.increment(&ProductId::new("42")).await;
        assert!(matches!(result, Err(CartError::QuantityExceedsLimit { .. })));
        assert_eq!(store.revision().await, 0);
    }

    #[tokio::test]
    async fn test_close_waits_for_writes() {
        let kv = Arc::new(MemoryStore::new());
        let config = CartConfig::default();
        let store = CartStore::open(Arc::clone(&kv), &config).await.unwrap();

        let _ = store.add_to_cart(mug()).await.unwrap();
        store.close().await.unwrap();

        let raw = kv.get(&config.storage_key).await.unwrap().unwrap();
        let cart: Cart = serde_json::from_str(&raw).unwrap();
        assert_eq!(cart.item_count(), 1);
    }
}
