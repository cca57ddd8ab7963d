use std::sync::Arc;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{info, instrument, warn};

use crate::{
    config::AppConfig,
    errors::ServiceError,
    events::{Event, EventSender},
    models::{
        CartLine, Order, OrderStatus, PaymentMethod, ShippingAddress, ShippingMethod,
        TimelineEntry,
    },
    store::MockStore,
};

/// How far before the processing entry the seeded pending entry is
/// backdated, so a freshly created order already reads as confirmed.
const PENDING_BACKDATE_SECS: i64 = 60;

/// Checkout pricing rules.
#[derive(Debug, Clone)]
pub struct PricingConfig {
    pub tax_rate: Decimal,
    pub free_shipping_threshold: Decimal,
    pub shipping_rate_standard: Decimal,
    pub shipping_rate_express: Decimal,
    pub shipping_rate_overnight: Decimal,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            tax_rate: dec!(0.08),
            free_shipping_threshold: dec!(50),
            shipping_rate_standard: dec!(9.99),
            shipping_rate_express: dec!(19.99),
            shipping_rate_overnight: dec!(29.99),
        }
    }
}

impl From<&AppConfig> for PricingConfig {
    fn from(cfg: &AppConfig) -> Self {
        let to_decimal = |v: f64, fallback: Decimal| Decimal::from_f64_retain(v).unwrap_or(fallback);
        let defaults = Self::default();
        Self {
            tax_rate: to_decimal(cfg.default_tax_rate, defaults.tax_rate),
            free_shipping_threshold: to_decimal(
                cfg.free_shipping_threshold,
                defaults.free_shipping_threshold,
            ),
            shipping_rate_standard: to_decimal(
                cfg.shipping_rate_standard,
                defaults.shipping_rate_standard,
            ),
            shipping_rate_express: to_decimal(
                cfg.shipping_rate_express,
                defaults.shipping_rate_express,
            ),
            shipping_rate_overnight: to_decimal(
                cfg.shipping_rate_overnight,
                defaults.shipping_rate_overnight,
            ),
        }
    }
}

impl PricingConfig {
    fn shipping_for(&self, method: ShippingMethod, subtotal: Decimal) -> Decimal {
        if subtotal >= self.free_shipping_threshold {
            Decimal::ZERO
        } else if subtotal > Decimal::ZERO {
            match method {
                ShippingMethod::Standard => self.shipping_rate_standard,
                ShippingMethod::Express => self.shipping_rate_express,
                ShippingMethod::Overnight => self.shipping_rate_overnight,
            }
        } else {
            Decimal::ZERO
        }
    }
}

/// Input for creating an order from a cart snapshot.
#[derive(Debug, Clone)]
pub struct CreateOrderInput {
    pub items: Vec<CartLine>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub shipping_method: ShippingMethod,
}

/// Order service: creation from cart snapshots plus status and timeline
/// tracking.
///
/// Lookups by unknown id soft-miss with `None`/empty rather than erroring;
/// only invalid input is reported as an error.
#[derive(Clone)]
pub struct OrderService {
    store: Arc<MockStore>,
    event_sender: Arc<EventSender>,
    pricing: PricingConfig,
}

impl OrderService {
    pub fn new(
        store: Arc<MockStore>,
        event_sender: Arc<EventSender>,
        pricing: PricingConfig,
    ) -> Self {
        Self {
            store,
            event_sender,
            pricing,
        }
    }

    #[instrument(skip(self))]
    pub async fn get_all(&self) -> Vec<Order> {
        self.store.simulate_io().await;
        self.store.orders.read().await.clone()
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: i32) -> Option<Order> {
        self.store.simulate_io().await;
        self.store
            .orders
            .read()
            .await
            .iter()
            .find(|order| order.id == id)
            .cloned()
    }

    /// Creates an order from the given cart snapshot.
    ///
    /// The new id is one greater than the current maximum (1 for an empty
    /// store). Totals are computed server-side from catalog prices; lines
    /// whose product is unknown contribute nothing. The order starts in
    /// `processing` with a timeline already carrying a backdated `pending`
    /// entry, simulating a confirmed payment.
    #[instrument(skip(self, input), fields(lines = input.items.len()))]
    pub async fn create(&self, input: CreateOrderInput) -> Result<Order, ServiceError> {
        let items: Vec<CartLine> = input
            .items
            .into_iter()
            .filter(|line| !line.saved_for_later)
            .collect();
        if items.is_empty() {
            return Err(ServiceError::ValidationError(
                "Cannot create an order with no active items".to_string(),
            ));
        }

        self.store.simulate_io().await;

        let subtotal = self.subtotal_of(&items).await;
        let shipping = self.pricing.shipping_for(input.shipping_method, subtotal);
        let tax = (subtotal * self.pricing.tax_rate).round_dp(2);
        let total = subtotal + shipping + tax;

        let now = Utc::now();
        let timeline = vec![
            TimelineEntry {
                status: OrderStatus::Pending,
                timestamp: now - Duration::seconds(PENDING_BACKDATE_SECS),
                description: OrderStatus::Pending.timeline_description().to_string(),
            },
            TimelineEntry {
                status: OrderStatus::Processing,
                timestamp: now,
                description: OrderStatus::Processing.timeline_description().to_string(),
            },
        ];

        let order = {
            let mut orders = self.store.orders.write().await;
            let id = orders.iter().map(|order| order.id).max().unwrap_or(0) + 1;
            let order = Order {
                id,
                items,
                subtotal,
                shipping,
                tax,
                total,
                shipping_address: input.shipping_address,
                payment_method: input.payment_method,
                shipping_method: input.shipping_method,
                status: OrderStatus::Processing,
                date: now,
                timeline,
            };
            orders.push(order.clone());
            order
        };

        self.event_sender
            .send_or_log(Event::OrderCreated(order.id))
            .await;

        info!(order_id = order.id, total = %order.total, "Created order");
        Ok(order)
    }

    /// Sets an order's status, appending a timeline entry when this status
    /// has none yet. Idempotent per status: a repeat update never
    /// duplicates the entry. The timeline is re-sorted into canonical
    /// tracking order regardless of the order updates arrive in.
    ///
    /// Returns `None` when the order does not exist (soft miss).
    #[instrument(skip(self), fields(order_id = id, new_status = %status))]
    pub async fn update_status(&self, id: i32, status: OrderStatus) -> Option<Order> {
        self.store.simulate_io().await;

        let (old_status, updated) = {
            let mut orders = self.store.orders.write().await;
            let order = orders.iter_mut().find(|order| order.id == id)?;

            let old_status = order.status;
            order.status = status;

            if !order.timeline.iter().any(|entry| entry.status == status) {
                order.timeline.push(TimelineEntry {
                    status,
                    timestamp: Utc::now(),
                    description: status.timeline_description().to_string(),
                });
                order
                    .timeline
                    .sort_by_key(|entry| entry.status.canonical_rank());
            }

            (old_status, order.clone())
        };

        self.event_sender
            .send_or_log(Event::OrderStatusChanged {
                order_id: id,
                old_status,
                new_status: status,
            })
            .await;

        info!(order_id = id, old_status = %old_status, "Order status updated");
        Some(updated)
    }

    /// The order's tracking timeline, empty when the order is unknown.
    #[instrument(skip(self))]
    pub async fn order_timeline(&self, id: i32) -> Vec<TimelineEntry> {
        self.store.simulate_io().await;
        self.store
            .orders
            .read()
            .await
            .iter()
            .find(|order| order.id == id)
            .map(|order| order.timeline.clone())
            .unwrap_or_default()
    }

    async fn subtotal_of(&self, items: &[CartLine]) -> Decimal {
        let catalog = self.store.catalog();
        items
            .iter()
            .map(|line| {
                catalog
                    .iter()
                    .find(|product| product.id == line.product_id)
                    .map(|product| product.price * Decimal::from(line.quantity))
                    .unwrap_or_else(|| {
                        warn!(
                            product_id = line.product_id,
                            "Cart line references unknown product, pricing it at zero"
                        );
                        Decimal::ZERO
                    })
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipping_free_at_threshold() {
        let pricing = PricingConfig::default();
        assert_eq!(
            pricing.shipping_for(ShippingMethod::Standard, dec!(50.00)),
            Decimal::ZERO
        );
    }

    #[test]
    fn shipping_rates_by_method_under_threshold() {
        let pricing = PricingConfig::default();
        assert_eq!(
            pricing.shipping_for(ShippingMethod::Standard, dec!(49.99)),
            dec!(9.99)
        );
        assert_eq!(
            pricing.shipping_for(ShippingMethod::Express, dec!(49.99)),
            dec!(19.99)
        );
        assert_eq!(
            pricing.shipping_for(ShippingMethod::Overnight, dec!(49.99)),
            dec!(29.99)
        );
    }

    #[test]
    fn shipping_zero_for_empty_subtotal() {
        let pricing = PricingConfig::default();
        assert_eq!(
            pricing.shipping_for(ShippingMethod::Overnight, Decimal::ZERO),
            Decimal::ZERO
        );
    }
}
