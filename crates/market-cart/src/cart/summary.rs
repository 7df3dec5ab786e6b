//! Cart totals.

use std::sync::Arc;

use crate::cart::Cart;
use crate::error::CartError;
use crate::ids::ProductId;
use crate::money::{Currency, Money, Price};
use serde::Serialize;

/// Totals derived from a cart.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CartSummary {
    /// Sum of unit price times quantity over every line, rounded to minor
    /// units once.
    pub total_price: Money,
    /// Sum of quantities.
    pub total_items: u64,
    /// Per-line breakdown, in cart order.
    pub lines: Vec<LineTotal>,
}

/// Totals for a single line.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LineTotal {
    /// Product id.
    pub id: ProductId,
    /// Unit price.
    pub unit_price: Money,
    /// Quantity.
    pub quantity: u32,
    /// unit_price * quantity.
    pub subtotal: Money,
}

impl CartSummary {
    /// Derive totals from a cart priced in `currency`.
    ///
    /// Line subtotals and the total are summed exactly and rounded to
    /// minor units only when converted to [`Money`]. An empty cart yields
    /// zero for both totals.
    pub fn of(cart: &Cart, currency: Currency) -> Result<Self, CartError> {
        let mut total = Price::default();
        let mut lines = Vec::with_capacity(cart.len());

        for item in cart.items() {
            let subtotal = item
                .price
                .checked_mul(item.quantity)
                .ok_or(CartError::Overflow)?;
            total = total.checked_add(&subtotal).ok_or(CartError::Overflow)?;

            lines.push(LineTotal {
                id: item.id.clone(),
                unit_price: item.price.to_money(currency)?,
                quantity: item.quantity,
                subtotal: subtotal.to_money(currency)?,
            });
        }

        Ok(Self {
            total_price: total.to_money(currency)?,
            total_items: cart.item_count(),
            lines,
        })
    }

    /// Totals for an empty cart.
    pub fn empty(currency: Currency) -> Self {
        Self {
            total_price: Money::zero(currency),
            total_items: 0,
            lines: Vec::new(),
        }
    }
}

/// Caches the summary of the most recently seen cart.
///
/// Carts are replaced, never edited in place, once published by the store,
/// so pointer identity of the `Arc` is enough to know the totals are still
/// valid.
#[derive(Debug)]
pub struct SummaryMemo {
    currency: Currency,
    cached: Option<(Arc<Cart>, Arc<CartSummary>)>,
    recomputations: u64,
}

impl SummaryMemo {
    /// Create an empty memo for `currency`.
    pub fn new(currency: Currency) -> Self {
        Self {
            currency,
            cached: None,
            recomputations: 0,
        }
    }

    /// Summary of `cart`, recomputed only if `cart` is a different
    /// allocation from the last call.
    pub fn summarize(&mut self, cart: &Arc<Cart>) -> Result<Arc<CartSummary>, CartError> {
        if let Some((seen, summary)) = &self.cached {
            if Arc::ptr_eq(seen, cart) {
                return Ok(Arc::clone(summary));
            }
        }

        let summary = Arc::new(CartSummary::of(cart, self.currency)?);
        self.cached = Some((Arc::clone(cart), Arc::clone(&summary)));
        self.recomputations += 1;
        Ok(summary)
    }

    /// Number of times totals were actually computed.
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }
}
