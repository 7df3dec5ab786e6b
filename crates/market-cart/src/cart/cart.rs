//! Cart and line item types.

use std::collections::HashSet;

use crate::error::CartError;
use crate::ids::ProductId;
use crate::money::Price;
use serde::{Deserialize, Serialize};

/// Quantity past which [`Cart::add`] and [`Cart::increment`] refuse to go.
///
/// Loaded records may hold larger quantities; those lines are kept as they
/// are and can only be decremented.
pub const MAX_QUANTITY_PER_ITEM: u32 = 9999;

/// A product line in the cart.
///
/// Field names are the persisted record's schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    /// Product identifier.
    pub id: ProductId,
    /// Product title (display only).
    pub title: String,
    /// Product image reference (display only).
    pub image_url: String,
    /// Unit price.
    pub price: Price,
    /// Quantity, always at least 1.
    pub quantity: u32,
}

/// Input to [`Cart::add`]: an item without a quantity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewItem {
    /// Product identifier.
    pub id: ProductId,
    /// Product title.
    pub title: String,
    /// Product image reference.
    pub image_url: String,
    /// Unit price.
    pub price: Price,
}

impl NewItem {
    /// Create a new item description.
    pub fn new(
        id: impl Into<ProductId>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        price: Price,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            price,
        }
    }

    fn into_item(self) -> Item {
        Item {
            id: self.id,
            title: self.title,
            image_url: self.image_url,
            price: self.price,
            quantity: 1,
        }
    }
}

/// Outcome of a quantity change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    /// The item now has this quantity.
    Updated { quantity: u32 },
    /// The item's quantity reached zero and it was removed.
    Removed,
    /// No item with that id; nothing changed.
    Missing,
}

impl Adjustment {
    /// Whether the cart changed.
    pub fn is_change(&self) -> bool {
        !matches!(self, Adjustment::Missing)
    }
}

/// An ordered list of cart items, unique by id, every quantity at least 1.
///
/// Serializes as the bare item array. Deserialization rejects records that
/// break either invariant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Item>", into = "Vec<Item>")]
pub struct Cart {
    items: Vec<Item>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from items, checking that quantities are positive and
    /// ids unique.
    pub fn from_items(items: Vec<Item>) -> Result<Self, CartError> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if item.quantity == 0 {
                return Err(CartError::InvalidRecord(format!(
                    "item {} has zero quantity",
                    item.id
                )));
            }
            if !seen.insert(&item.id) {
                return Err(CartError::InvalidRecord(format!(
                    "duplicate item id {}",
                    item.id
                )));
            }
        }
        Ok(Self { items })
    }

    /// Add one unit of an item.
    ///
    /// An existing line with the same id has its quantity incremented;
    /// otherwise the item is appended with quantity 1.
    pub fn add(&mut self, item: NewItem) -> Result<Adjustment, CartError> {
        if self.position(&item.id).is_some() {
            return self.increment(&item.id);
        }
        self.items.push(item.into_item());
        Ok(Adjustment::Updated { quantity: 1 })
    }

    /// Increase an item's quantity by 1.
    ///
    /// Returns [`Adjustment::Missing`] if the id is not in the cart.
    pub fn increment(&mut self, id: &ProductId) -> Result<Adjustment, CartError> {
        let Some(item) = self.items.iter_mut().find(|i| &i.id == id) else {
            return Ok(Adjustment::Missing);
        };

        if item.quantity >= MAX_QUANTITY_PER_ITEM {
            return Err(CartError::QuantityExceedsLimit {
                id: id.to_string(),
                max: MAX_QUANTITY_PER_ITEM,
            });
        }

        item.quantity += 1;
        Ok(Adjustment::Updated {
            quantity: item.quantity,
        })
    }

    /// Decrease an item's quantity by 1, removing it at zero.
    ///
    /// Returns [`Adjustment::Missing`] if the id is not in the cart.
    pub fn decrement(&mut self, id: &ProductId) -> Adjustment {
        let Some(index) = self.position(id) else {
            return Adjustment::Missing;
        };

        let item = &mut self.items[index];
        if item.quantity <= 1 {
            self.items.remove(index);
            return Adjustment::Removed;
        }

        item.quantity -= 1;
        Adjustment::Updated {
            quantity: item.quantity,
        }
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Get an item by id.
    pub fn get(&self, id: &ProductId) -> Option<&Item> {
        self.items.iter().find(|i| &i.id == id)
    }

    /// Get total item count (sum of quantities).
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Get number of distinct lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, id: &ProductId) -> Option<usize> {
        self.items.iter().position(|i| &i.id == id)
    }
}

impl TryFrom<Vec<Item>> for Cart {
    type Error = CartError;

    fn try_from(items: Vec<Item>) -> Result<Self, Self::Error> {
        Self::from_items(items)
    }
}

impl From<Cart> for Vec<Item> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, cents: u64) -> NewItem {
        NewItem::new(
            id,
            format!("Product {id}"),
            format!("https://img/{id}.png"),
            Price::from_cents(cents),
        )
    }

    #[test]
    fn test_cart_creation() {
        let cart = Cart::new();
        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_add_item() {
        let mut cart = Cart::new();
        let outcome = cart.add(item("1", 1000)).unwrap();

        assert_eq!(outcome, Adjustment::Updated { quantity: 1 });
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(&ProductId::new("1")).unwrap().quantity, 1);
    }

    #[test]
    fn test_add_same_item_increases_quantity() {
        let mut cart = Cart::new();
        cart.add(item("1", 1000)).unwrap();
        let outcome = cart.add(item("1", 1000)).unwrap();

        assert_eq!(outcome, Adjustment::Updated { quantity: 2 });
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut cart = Cart::new();
        cart.add(item("b", 100)).unwrap();
        cart.add(item("a", 100)).unwrap();
        cart.add(item("b", 100)).unwrap();

        let ids: Vec<&str> = cart.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn test_increment_missing_is_noop() {
        let mut cart = Cart::new();
        cart.add(item("1", 1000)).unwrap();

        let outcome = cart.increment(&ProductId::new("2")).unwrap();
        assert_eq!(outcome, Adjustment::Missing);
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_decrement_removes_at_zero() {
        let mut cart = Cart::new();
        cart.add(item("1", 1000)).unwrap();
        cart.add(item("1", 1000)).unwrap();

        let id = ProductId::new("1");
        assert_eq!(cart.decrement(&id), Adjustment::Updated { quantity: 1 });
        assert_eq!(cart.decrement(&id), Adjustment::Removed);
        assert!(cart.get(&id).is_none());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_decrement_missing_is_noop() {
        let mut cart = Cart::new();
        cart.add(item("1", 1000)).unwrap();

        assert_eq!(cart.decrement(&ProductId::new("nope")), Adjustment::Missing);
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_quantity_limit() {
        let mut cart = Cart::from_items(vec![Item {
            id: ProductId::new("1"),
            title: "Max".to_string(),
            image_url: String::new(),
            price: Price::from_cents(100),
            quantity: MAX_QUANTITY_PER_ITEM,
        }])
        .unwrap();

        let result = cart.increment(&ProductId::new("1"));
        assert!(matches!(result, Err(CartError::QuantityExceedsLimit { .. })));
        assert_eq!(cart.item_count(), u64::from(MAX_QUANTITY_PER_ITEM));
    }

    #[test]
    fn test_json_schema() {
        let mut cart = Cart::new();
        cart.add(NewItem::new("42", "Mug", "https://img/mug.png", Price::from_cents(1050)))
            .unwrap();

        let json = serde_json::to_string(&cart).unwrap();
        let expected = concat!(
            r#"[{"id":"42","title":"Mug","image_url":"https://img/mug.png","#,
            r#""price":10.5,"quantity":1}]"#
        );
        assert_eq!(json, expected);
    }

    #[test]
    fn test_from_json_accepts_integer_prices() {
        let raw = r#"[{"id":"1","title":"Cap","image_url":"u","price":10,"quantity":2}]"#;
        let cart = serde_json::from_str::<Cart>(raw).unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].price, Price::from_cents(1000));
        assert_eq!(cart.items()[0].quantity, 2);
    }

    #[test]
    fn test_from_json_keeps_quantity_above_limit() {
        let raw = r#"[
            {"id":"1","title":"Bulk","image_url":"u","price":1,"quantity":10000},
            {"id":"2","title":"Cap","image_url":"u","price":5,"quantity":3}
        ]"#;
        let mut cart = serde_json::from_str::<Cart>(raw).unwrap();
        assert_eq!(cart.len(), 2);

        let bulk = ProductId::new("1");
        assert!(matches!(
            cart.increment(&bulk),
            Err(CartError::QuantityExceedsLimit { .. })
        ));
        assert_eq!(cart.decrement(&bulk), Adjustment::Updated { quantity: 9999 });
    }

    #[test]
    fn test_sub_cent_price_survives_round_trip() {
        let raw = r#"[{"id":"1","title":"Cap","image_url":"u","price":12.345,"quantity":1}]"#;
        let mut cart = serde_json::from_str::<Cart>(raw).unwrap();
        cart.increment(&ProductId::new("1")).unwrap();

        let json = serde_json::to_string(&cart).unwrap();
        assert!(json.contains(r#""price":12.345"#), "{json}");
    }

    #[test]
    fn test_from_json_rejects_zero_quantity() {
        let raw = r#"[{"id":"1","title":"Cap","image_url":"u","price":10,"quantity":0}]"#;
        assert!(serde_json::from_str::<Cart>(raw).is_err());
    }

    #[test]
    fn test_from_json_rejects_duplicate_ids() {
        let raw = r#"[
            {"id":"1","title":"Cap","image_url":"u","price":10,"quantity":1},
            {"id":"1","title":"Cap","image_url":"u","price":10,"quantity":3}
        ]"#;
        assert!(serde_json::from_str::<Cart>(raw).is_err());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(serde_json::from_str::<Cart>("{oops").is_err());
    }
}
