use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};

use crate::{
    errors::ServiceError,
    events::{Event, EventSender},
    models::WishlistEntry,
    store::MockStore,
};

/// Wishlist service over a single in-memory list keyed by product id.
///
/// Mutations reject ids that cannot reference a product; the membership
/// check instead degrades to `false` so transient bad input from callers
/// never breaks a read path.
#[derive(Clone)]
pub struct WishlistService {
    store: Arc<MockStore>,
    event_sender: Arc<EventSender>,
}

impl WishlistService {
    pub fn new(store: Arc<MockStore>, event_sender: Arc<EventSender>) -> Self {
        Self {
            store,
            event_sender,
        }
    }

    fn validate_product_id(product_id: i32) -> Result<(), ServiceError> {
        if product_id <= 0 {
            return Err(ServiceError::ValidationError(format!(
                "Product ID must be positive, got {}",
                product_id
            )));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get_all(&self) -> Vec<WishlistEntry> {
        self.store.simulate_io().await;
        self.store.wishlist.read().await.clone()
    }

    /// Adds a product to the wishlist. No-op when already present: the
    /// wishlist never holds duplicate product ids.
    #[instrument(skip(self))]
    pub async fn add(&self, product_id: i32) -> Result<Vec<WishlistEntry>, ServiceError> {
        Self::validate_product_id(product_id)?;
        self.store.simulate_io().await;

        let snapshot = {
            let mut wishlist = self.store.wishlist.write().await;
            if !wishlist.iter().any(|entry| entry.product_id == product_id) {
                let id = wishlist.len() as i32 + 1;
                wishlist.push(WishlistEntry {
                    id,
                    product_id,
                    added_at: Utc::now(),
                });
            }
            wishlist.clone()
        };

        self.event_sender
            .send_or_log(Event::WishlistItemAdded { product_id })
            .await;

        Ok(snapshot)
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, product_id: i32) -> Result<Vec<WishlistEntry>, ServiceError> {
        Self::validate_product_id(product_id)?;
        self.store.simulate_io().await;

        let snapshot = {
            let mut wishlist = self.store.wishlist.write().await;
            wishlist.retain(|entry| entry.product_id != product_id);
            wishlist.clone()
        };

        self.event_sender
            .send_or_log(Event::WishlistItemRemoved { product_id })
            .await;

        Ok(snapshot)
    }

    /// Membership check. Degrades to `false` on invalid input instead of
    /// erroring.
    #[instrument(skip(self))]
    pub async fn contains(&self, product_id: i32) -> bool {
        if Self::validate_product_id(product_id).is_err() {
            return false;
        }
        self.store.simulate_io().await;

        self.store
            .wishlist
            .read()
            .await
            .iter()
            .any(|entry| entry.product_id == product_id)
    }

    #[instrument(skip(self))]
    pub async fn count(&self) -> usize {
        self.store.simulate_io().await;
        self.store.wishlist.read().await.len()
    }

    /// Adds the product when absent, removes it when present. Returns the
    /// resulting membership.
    #[instrument(skip(self))]
    pub async fn toggle(&self, product_id: i32) -> Result<bool, ServiceError> {
        Self::validate_product_id(product_id)?;

        if self.contains(product_id).await {
            self.remove(product_id).await?;
            Ok(false)
        } else {
            self.add(product_id).await?;
            Ok(true)
        }
    }

    #[instrument(skip(self))]
    pub async fn clear(&self) -> Vec<WishlistEntry> {
        self.store.simulate_io().await;

        self.store.wishlist.write().await.clear();
        self.event_sender.send_or_log(Event::WishlistCleared).await;

        info!("Cleared wishlist");
        Vec::new()
    }
}
