use std::sync::Arc;

use tracing::{info, instrument};

use crate::{
    events::{Event, EventSender},
    models::CartLine,
    store::MockStore,
};

/// Shopping cart service.
///
/// The cart is a single in-memory list of lines, at most one per product.
/// "Saved for later" is a flag on the line, not a separate store: saving
/// and restoring toggle it in place. Every operation returns a defensive
/// snapshot of the full cart so callers never observe later mutations.
#[derive(Clone)]
pub struct CartService {
    store: Arc<MockStore>,
    event_sender: Arc<EventSender>,
}

impl CartService {
    pub fn new(store: Arc<MockStore>, event_sender: Arc<EventSender>) -> Self {
        Self {
            store,
            event_sender,
        }
    }

    /// Current cart snapshot, saved-for-later lines included.
    #[instrument(skip(self))]
    pub async fn get_cart_items(&self) -> Vec<CartLine> {
        self.store.simulate_io().await;
        self.store.cart.read().await.clone()
    }

    /// Adds a product to the cart, or bumps its quantity when a line for
    /// it already exists. The service itself puts no upper bound on the
    /// quantity; the HTTP layer enforces the 1-10 range shown in the UI.
    #[instrument(skip(self))]
    pub async fn add_item(&self, product_id: i32, quantity: i32) -> Vec<CartLine> {
        self.store.simulate_io().await;

        let snapshot = {
            let mut cart = self.store.cart.write().await;
            match cart.iter_mut().find(|line| line.product_id == product_id) {
                Some(line) => line.quantity += quantity,
                None => cart.push(CartLine::new(product_id, quantity)),
            }
            cart.clone()
        };

        self.event_sender
            .send_or_log(Event::CartItemAdded {
                product_id,
                quantity,
            })
            .await;

        info!(product_id, quantity, "Added item to cart");
        snapshot
    }

    /// Sets a line's quantity directly. No-op when the product has no
    /// line in the cart.
    #[instrument(skip(self))]
    pub async fn update_quantity(&self, product_id: i32, quantity: i32) -> Vec<CartLine> {
        self.store.simulate_io().await;

        let mut cart = self.store.cart.write().await;
        if let Some(line) = cart.iter_mut().find(|line| line.product_id == product_id) {
            line.quantity = quantity;
        }
        cart.clone()
    }

    /// Removes a product's line. Idempotent.
    #[instrument(skip(self))]
    pub async fn remove_item(&self, product_id: i32) -> Vec<CartLine> {
        self.store.simulate_io().await;

        let snapshot = {
            let mut cart = self.store.cart.write().await;
            cart.retain(|line| line.product_id != product_id);
            cart.clone()
        };

        self.event_sender
            .send_or_log(Event::CartItemRemoved { product_id })
            .await;

        snapshot
    }

    /// Flags a line as saved for later, keeping it in the cart store.
    #[instrument(skip(self))]
    pub async fn save_for_later(&self, product_id: i32) -> Vec<CartLine> {
        self.set_saved_flag(product_id, true).await
    }

    /// Moves a saved-for-later line back into the active cart.
    #[instrument(skip(self))]
    pub async fn move_to_cart(&self, product_id: i32) -> Vec<CartLine> {
        self.set_saved_flag(product_id, false).await
    }

    async fn set_saved_flag(&self, product_id: i32, saved: bool) -> Vec<CartLine> {
        self.store.simulate_io().await;

        let mut cart = self.store.cart.write().await;
        if let Some(line) = cart.iter_mut().find(|line| line.product_id == product_id) {
            line.saved_for_later = saved;
        }
        cart.clone()
    }

    /// Empties the cart, saved-for-later lines included.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self) -> Vec<CartLine> {
        self.store.simulate_io().await;

        self.store.cart.write().await.clear();
        self.event_sender.send_or_log(Event::CartCleared).await;

        info!("Cleared cart");
        Vec::new()
    }

    /// Badge count: sum of quantities across active lines. Saved-for-later
    /// lines are excluded.
    #[instrument(skip(self))]
    pub async fn cart_count(&self) -> i32 {
        self.store.simulate_io().await;

        self.store
            .cart
            .read()
            .await
            .iter()
            .filter(|line| !line.saved_for_later)
            .map(|line| line.quantity)
            .sum()
    }
}
