use std::sync::Arc;

use crate::{events::EventSender, store::MockStore};

pub mod cart;
pub mod catalog;
pub mod orders;
pub mod wishlist;

pub use cart::CartService;
pub use catalog::CatalogService;
pub use orders::OrderService;
pub use wishlist::WishlistService;

/// Aggregates the storefront services used by the HTTP handlers.
#[derive(Clone)]
pub struct AppServices {
    pub catalog: Arc<CatalogService>,
    pub cart: Arc<CartService>,
    pub wishlist: Arc<WishlistService>,
    pub orders: Arc<OrderService>,
}

impl AppServices {
    pub fn new(
        store: Arc<MockStore>,
        event_sender: Arc<EventSender>,
        pricing: orders::PricingConfig,
    ) -> Self {
        Self {
            catalog: Arc::new(CatalogService::new(store.clone())),
            cart: Arc::new(CartService::new(store.clone(), event_sender.clone())),
            wishlist: Arc::new(WishlistService::new(store.clone(), event_sender.clone())),
            orders: Arc::new(OrderService::new(store, event_sender, pricing)),
        }
    }
}
