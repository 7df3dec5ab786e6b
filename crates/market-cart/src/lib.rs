//! Client-side cart state for the marketplace app.
//!
//! - **Cart**: line items keyed by product id, with derived totals
//! - **Store**: the single owner of the cart, persisting every change to a
//!   key-value store and publishing snapshots to subscribers
//! - **View**: state behind the floating cart widget
//!
//! # Example
//!
//! ```rust,ignore
//! use market_cart::prelude::*;
//! use market_kv::FileStore;
//!
//! let config = CartConfig::default();
//! let store = CartStore::open(FileStore::open("cart.json"), &config).await?;
//!
//! // Fire and forget, or await the write.
//! let mug = NewItem::new("42", "Mug", "https://img/mug.png", "10.50".parse::<Price>()?);
//! store.add_to_cart(mug).await?.await?;
//!
//! let summary = CartSummary::of(&store.products(), config.currency)?;
//! println!("Total: {}", config.formatter().format(summary.total_price));
//! ```

pub mod cart;
pub mod config;
pub mod error;
pub mod format;
pub mod ids;
pub mod money;
pub mod store;
pub mod view;

pub use error::{CartError, WriteError};
pub use ids::ProductId;
pub use money::{Currency, Money, Price};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::cart::{
        Adjustment, Cart, CartSummary, Item, LineTotal, NewItem, SummaryMemo,
        MAX_QUANTITY_PER_ITEM,
    };
    pub use crate::config::CartConfig;
    pub use crate::error::{CartError, WriteError};
    pub use crate::format::{CurrencyFormatter, Locale, LocaleFormatter};
    pub use crate::ids::ProductId;
    pub use crate::money::{Currency, Money, Price};
    pub use crate::store::{CartStore, Hydration, PendingWrite};
    pub use crate::view::{CartBadge, FloatingCart, Navigator};
}
