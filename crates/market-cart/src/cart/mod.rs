//! Shopping cart module.
//!
//! Contains the cart entity, its line items and the totals derived from it.

mod cart;
mod summary;

pub use cart::{Adjustment, Cart, Item, NewItem, MAX_QUANTITY_PER_ITEM};
pub use summary::{CartSummary, LineTotal, SummaryMemo};
