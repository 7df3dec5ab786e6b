//! Floating cart widget state.
//!
//! Rendering is left to the UI layer; this module owns what the widget
//! shows and what happens when it is pressed.

use std::sync::Arc;

use tokio::sync::watch;

use crate::cart::{Cart, SummaryMemo};
use crate::error::CartError;
use crate::format::CurrencyFormatter;
use crate::money::Currency;

/// Navigation the widget can request.
pub trait Navigator {
    /// Open the cart screen.
    fn navigate_to_cart(&self);
}

/// What the floating cart displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartBadge {
    /// Total units in the cart.
    pub item_count: u64,
    /// Formatted total price.
    pub total_price: String,
}

impl CartBadge {
    /// Item count as text, e.g. `"3 items"`.
    pub fn item_label(&self) -> String {
        match self.item_count {
            1 => "1 item".to_string(),
            n => format!("{n} items"),
        }
    }
}

/// Read-only cart summary bound to a store subscription.
pub struct FloatingCart<N, F> {
    cart: watch::Receiver<Arc<Cart>>,
    memo: SummaryMemo,
    navigator: N,
    formatter: F,
}

impl<N, F> FloatingCart<N, F>
where
    N: Navigator,
    F: CurrencyFormatter,
{
    /// Bind to a cart subscription (see
    /// [`CartStore::subscribe`](crate::store::CartStore::subscribe)).
    pub fn new(
        cart: watch::Receiver<Arc<Cart>>,
        currency: Currency,
        navigator: N,
        formatter: F,
    ) -> Self {
        Self {
            cart,
            memo: SummaryMemo::new(currency),
            navigator,
            formatter,
        }
    }

    /// Badge for the latest cart. Totals are recomputed only when the store
    /// has published a new cart since the last call.
    pub fn badge(&mut self) -> Result<CartBadge, CartError> {
        let cart = Arc::clone(&*self.cart.borrow_and_update());
        let summary = self.memo.summarize(&cart)?;
        Ok(CartBadge {
            item_count: summary.total_items,
            total_price: self.formatter.format(summary.total_price),
        })
    }

    /// Wait for the store to publish a new cart. Returns `false` once the
    /// store is gone.
    pub async fn changed(&mut self) -> bool {
        self.cart.changed().await.is_ok()
    }

    /// Handle a press on the widget.
    pub fn press(&self) {
        self.navigator.navigate_to_cart();
    }

    /// Number of times totals were computed.
    pub fn recomputations(&self) -> u64 {
        self.memo.recomputations()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::NewItem;
    use crate::format::{Locale, LocaleFormatter};
    use crate::money::Price;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default, Clone)]
    struct CountingNavigator(Arc<AtomicUsize>);

    impl Navigator for CountingNavigator {
        fn navigate_to_cart(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn widget(
        rx: watch::Receiver<Arc<Cart>>,
    ) -> FloatingCart<CountingNavigator, LocaleFormatter> {
        FloatingCart::new(
            rx,
            Currency::BRL,
            CountingNavigator::default(),
            LocaleFormatter::new(Locale::PtBr),
        )
    }

    #[test]
    fn test_empty_badge() {
        let (_tx, rx) = watch::channel(Arc::new(Cart::new()));
        let mut view = widget(rx);

        let badge = view.badge().unwrap();
        assert_eq!(badge.item_count, 0);
        assert_eq!(badge.total_price, "R$ 0,00");
        assert_eq!(badge.item_label(), "0 items");
    }

    #[test]
    fn test_badge_follows_published_cart() {
        let (tx, rx) = watch::channel(Arc::new(Cart::new()));
        let mut view = widget(rx);
        view.badge().unwrap();

        let mut cart = Cart::new();
        cart.add(NewItem::new("1", "Cap", "", Price::from_cents(1000))).unwrap();
        cart.add(NewItem::new("1", "Cap", "", Price::from_cents(1000))).unwrap();
        cart.add(NewItem::new("2", "Mug", "", Price::from_cents(500))).unwrap();
        tx.send_replace(Arc::new(cart));

        let badge = view.badge().unwrap();
        assert_eq!(badge.item_count, 3);
        assert_eq!(badge.total_price, "R$ 25,00");
    }

    #[test]
    fn test_badge_is_memoized() {
        let (_tx, rx) = watch::channel(Arc::new(Cart::new()));
        let mut view = widget(rx);

        view.badge().unwrap();
        view.badge().unwrap();
        view.badge().unwrap();
        assert_eq!(view.recomputations(), 1);
    }

    #[test]
    fn test_press_navigates() {
        let (_tx, rx) = watch::channel(Arc::new(Cart::new()));
        let view = widget(rx);
        let presses = Arc::clone(&view.navigator.0);

        view.press();
        view.press();
        assert_eq!(presses.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_item_label_singular() {
        let badge = CartBadge {
            item_count: 1,
            total_price: String::new(),
        };
        assert_eq!(badge.item_label(), "1 item");
    }
}
