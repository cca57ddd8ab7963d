use std::time::Duration;

use tokio::sync::RwLock;
use tracing::info;

use crate::{
    errors::ServiceError,
    models::{CartLine, Order, Product, WishlistEntry},
};

/// Bundled catalog and order history, the storefront's only data source.
const PRODUCTS_JSON: &str = include_str!("../../data/products.json");
const ORDERS_JSON: &str = include_str!("../../data/orders.json");

/// Process-local data store backing every service.
///
/// The catalog is immutable reference data; cart, wishlist, and orders are
/// mutable lists guarded by `RwLock`s. There is no persistence: state
/// resets on restart, seeded from the bundled JSON. Construct one at
/// startup and hand `Arc<MockStore>` to the services; tests build their
/// own isolated instances.
pub struct MockStore {
    catalog: Vec<Product>,
    pub(crate) cart: RwLock<Vec<CartLine>>,
    pub(crate) wishlist: RwLock<Vec<WishlistEntry>>,
    pub(crate) orders: RwLock<Vec<Order>>,
    latency: Duration,
}

impl MockStore {
    /// Builds a store seeded from the bundled catalog and order history.
    pub fn seeded(latency: Duration) -> Result<Self, ServiceError> {
        let catalog: Vec<Product> = serde_json::from_str(PRODUCTS_JSON)?;
        let orders: Vec<Order> = serde_json::from_str(ORDERS_JSON)?;
        info!(
            products = catalog.len(),
            orders = orders.len(),
            "Seeded in-memory store from bundled data"
        );

        Ok(Self {
            catalog,
            cart: RwLock::new(Vec::new()),
            wishlist: RwLock::new(Vec::new()),
            orders: RwLock::new(orders),
            latency,
        })
    }

    /// Builds an empty store over the given catalog, with no simulated
    /// latency. Intended for tests.
    pub fn with_catalog(catalog: Vec<Product>) -> Self {
        Self {
            catalog,
            cart: RwLock::new(Vec::new()),
            wishlist: RwLock::new(Vec::new()),
            orders: RwLock::new(Vec::new()),
            latency: Duration::ZERO,
        }
    }

    /// Immutable product catalog.
    pub fn catalog(&self) -> &[Product] {
        &self.catalog
    }

    /// Simulates network/IO latency. Every service operation awaits this
    /// once before touching a store; there is no other delay or locking
    /// beyond the per-collection `RwLock`s.
    pub(crate) async fn simulate_io(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_seed_data_parses() {
        let store = MockStore::seeded(Duration::ZERO).expect("bundled data must parse");
        assert!(!store.catalog().is_empty());
    }

    #[test]
    fn bundled_catalog_upholds_product_invariants() {
        let store = MockStore::seeded(Duration::ZERO).unwrap();
        let mut seen = std::collections::HashSet::new();
        for product in store.catalog() {
            assert!(seen.insert(product.id), "duplicate product id {}", product.id);
            assert!(product.price >= rust_decimal::Decimal::ZERO);
            assert!((0.0..=5.0).contains(&product.rating));
            assert!(product.review_count >= 0);
            assert!(!product.images.is_empty());
        }
    }

    #[tokio::test]
    async fn seeded_orders_have_monotonic_ids() {
        let store = MockStore::seeded(Duration::ZERO).unwrap();
        let orders = store.orders.read().await;
        let mut ids: Vec<i32> = orders.iter().map(|o| o.id).collect();
        let unique: std::collections::HashSet<i32> = ids.iter().copied().collect();
        assert_eq!(unique.len(), ids.len());
        ids.sort_unstable();
        assert!(ids.first().copied().unwrap_or(1) >= 1);
    }
}
