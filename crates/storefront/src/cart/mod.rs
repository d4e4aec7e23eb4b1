//! Shopping cart keyed by product slug.
//!
//! The cart is a list of product snapshots with quantities. It is persisted
//! as a single JSON blob under [`CART_STORAGE_KEY`] after every change and
//! read back on the next request. A missing or unreadable blob is an empty
//! cart.
//!
//! Prices are the snapshot taken when the product was added; they are not
//! refreshed from the catalog.

mod storage;

pub use storage::{CartStorage, CartStorageError, MemoryCartStorage, SessionCartStorage};

use foxsports_core::{DEFAULT_CURRENCY, Product, format_currency};
use serde::{Deserialize, Serialize};

/// Storage key of the persisted cart.
pub const CART_STORAGE_KEY: &str = "foxsportscards1of1-cart";

/// One product in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: Product,
    /// Always at least 1.
    pub qty: u32,
}

impl CartLine {
    /// `qty × price`.
    #[must_use]
    pub fn subtotal(&self) -> f64 {
        f64::from(self.qty) * self.product.price
    }

    /// Subtotal formatted in the product's currency.
    #[must_use]
    pub fn display_subtotal(&self) -> String {
        format_currency(self.subtotal(), &self.product.currency)
    }
}

/// Cart contents. At most one line per slug.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub items: Vec<CartLine>,
}

impl Cart {
    /// Add `qty` units of `product`.
    ///
    /// Increments the existing line for the product's slug, or appends a new
    /// one. Returns `false` when nothing changed (`qty` is zero).
    pub fn add(&mut self, product: Product, qty: u32) -> bool {
        if qty == 0 {
            return false;
        }

        if let Some(line) = self.items.iter_mut().find(|line| line.product.slug == product.slug) {
            line.qty = line.qty.saturating_add(qty);
        } else {
            self.items.push(CartLine { product, qty });
        }
        true
    }

    /// Remove the line for `slug`. Returns `false` if there was none.
    pub fn remove(&mut self, slug: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|line| line.product.slug != slug);
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.qty)).sum()
    }

    /// Currency of the first line, or the store default.
    #[must_use]
    pub fn currency(&self) -> &str {
        self.items
            .first()
            .map_or(DEFAULT_CURRENCY, |line| line.product.currency.as_str())
    }

    /// Sum of line subtotals, regardless of currency.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.items.iter().map(CartLine::subtotal).sum()
    }

    /// Estimated total formatted in [`Cart::currency`].
    #[must_use]
    pub fn display_total(&self) -> String {
        format_currency(self.total(), self.currency())
    }
}

/// A cart bound to its storage backend.
///
/// Each mutating call updates the in-memory cart and writes it back before
/// returning. Two requests for the same visitor racing each other resolve
/// last-write-wins.
#[derive(Debug)]
pub struct CartStore<S> {
    storage: S,
    cart: Cart,
}

impl<S: CartStorage> CartStore<S> {
    /// Load the persisted cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails. A blob that does not
    /// decode is logged and replaced by an empty cart.
    pub async fn load(storage: S) -> Result<Self, CartStorageError> {
        let cart = match storage.read(CART_STORAGE_KEY).await? {
            Some(blob) => serde_json::from_str(&blob).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Discarding unreadable persisted cart");
                Cart::default()
            }),
            None => Cart::default(),
        };

        Ok(Self { storage, cart })
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Add `qty` units of `product` and persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    pub async fn add(&mut self, product: Product, qty: u32) -> Result<(), CartStorageError> {
        if self.cart.add(product, qty) {
            self.persist().await?;
        }
        Ok(())
    }

    /// Remove the line for `slug` and persist. Absent slugs are a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    pub async fn remove(&mut self, slug: &str) -> Result<(), CartStorageError> {
        if self.cart.remove(slug) {
            self.persist().await?;
        }
        Ok(())
    }

    /// Empty the cart and persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    pub async fn clear(&mut self) -> Result<(), CartStorageError> {
        self.cart.clear();
        self.persist().await
    }

    async fn persist(&self) -> Result<(), CartStorageError> {
        let blob = serde_json::to_string(&self.cart)?;
        self.storage.write(CART_STORAGE_KEY, blob).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::test_support::product;

    fn quantities(cart: &Cart) -> BTreeMap<String, u32> {
        cart.items
            .iter()
            .map(|line| (line.product.slug.to_string(), line.qty))
            .collect()
    }

    #[test]
    fn test_repeated_add_keeps_one_line() {
        let mut cart = Cart::default();
        let card = product("wemby-prizm", "Wemby Prizm");
        for qty in [1, 3, 2] {
            cart.add(card.clone(), qty);
        }

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].qty, 6);
        assert_eq!(cart.item_count(), 6);
    }

    #[test]
    fn test_add_appends_distinct_slugs_in_order() {
        let mut cart = Cart::default();
        cart.add(product("b", "B"), 1);
        cart.add(product("a", "A"), 1);
        cart.add(product("b", "B"), 1);

        let order: Vec<_> = cart.items.iter().map(|l| l.product.slug.to_string()).collect();
        assert_eq!(order, vec!["b", "a"]);
    }

    #[test]
    fn test_add_zero_is_noop() {
        let mut cart = Cart::default();
        assert!(!cart.add(product("a", "A"), 0));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_saturates() {
        let mut cart = Cart::default();
        cart.add(product("a", "A"), u32::MAX);
        cart.add(product("a", "A"), 10);
        assert_eq!(cart.items[0].qty, u32::MAX);
    }

    #[test]
    fn test_remove_absent_slug_is_noop() {
        let mut cart = Cart::default();
        cart.add(product("a", "A"), 2);
        let before = cart.clone();

        assert!(!cart.remove("missing"));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cart = Cart::default();
        cart.add(product("a", "A"), 1);
        cart.add(product("b", "B"), 1);

        assert!(cart.remove("a"));
        assert_eq!(quantities(&cart), BTreeMap::from([("b".to_string(), 1)]));

        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_totals_use_first_line_currency() {
        let mut cart = Cart::default();
        let mut a = product("a", "A");
        a.price = 500.0;
        let mut b = product("b", "B");
        b.price = 1500.0;
        cart.add(a, 2);
        cart.add(b, 1);

        assert!((cart.total() - 2500.0).abs() < f64::EPSILON);
        assert_eq!(cart.display_total(), "RD$2,500");
        assert_eq!(cart.items[0].display_subtotal(), "RD$1,000");
    }

    #[test]
    fn test_empty_cart_currency_defaults() {
        assert_eq!(Cart::default().currency(), "DOP");
    }

    #[tokio::test]
    async fn test_store_round_trips_through_storage() {
        let storage = MemoryCartStorage::new();
        let mut store = CartStore::load(storage.clone()).await.unwrap();
        store.add(product("a", "A"), 2).await.unwrap();
        store.add(product("b", "B"), 1).await.unwrap();
        store.add(product("c", "C"), 5).await.unwrap();
        store.remove("b").await.unwrap();

        let reloaded = CartStore::load(storage).await.unwrap();
        assert_eq!(quantities(reloaded.cart()), quantities(store.cart()));
        assert_eq!(reloaded.cart(), store.cart());
    }

    #[tokio::test]
    async fn test_store_loads_empty_without_blob() {
        let store = CartStore::load(MemoryCartStorage::new()).await.unwrap();
        assert!(store.cart().is_empty());
    }

    #[tokio::test]
    async fn test_store_treats_corrupt_blob_as_empty() {
        let storage = MemoryCartStorage::new();
        storage.insert_raw(CART_STORAGE_KEY, "{not json").unwrap();

        let mut store = CartStore::load(storage.clone()).await.unwrap();
        assert!(store.cart().is_empty());

        store.add(product("a", "A"), 1).await.unwrap();
        let reloaded = CartStore::load(storage).await.unwrap();
        assert_eq!(reloaded.cart().item_count(), 1);
    }

    #[tokio::test]
    async fn test_store_clear_persists() {
        let storage = MemoryCartStorage::new();
        let mut store = CartStore::load(storage.clone()).await.unwrap();
        store.add(product("a", "A"), 1).await.unwrap();
        store.clear().await.unwrap();

        let reloaded = CartStore::load(storage).await.unwrap();
        assert!(reloaded.cart().is_empty());
    }
}
