use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

/// A catalog product. Reference data: services only ever read these.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub category: String,
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Decimal>,
    pub rating: f32,
    pub review_count: i32,
    /// Ordered image URIs, first one is the primary image.
    pub images: Vec<String>,
    pub in_stock: bool,
    /// Discount percentage, when the product is on sale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<i32>,
    pub date_added: DateTime<Utc>,
}

/// One product's presence in the cart.
///
/// The cart store holds at most one line per `product_id`; repeat adds
/// increment `quantity` instead of inserting a duplicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: i32,
    pub quantity: i32,
    pub saved_for_later: bool,
}

impl CartLine {
    pub fn new(product_id: i32, quantity: i32) -> Self {
        Self {
            product_id,
            quantity,
            saved_for_later: false,
        }
    }
}

/// A liked product. `product_id` is unique within the wishlist.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    pub id: i32,
    pub product_id: i32,
    pub added_at: DateTime<Utc>,
}

/// Order lifecycle states, in canonical tracking order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
}

impl OrderStatus {
    /// Position in the canonical tracking order. Timeline entries are kept
    /// sorted by this rank regardless of the order updates arrive in.
    pub fn canonical_rank(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Processing => 1,
            Self::Shipped => 2,
            Self::Delivered => 3,
        }
    }

    /// Customer-facing description recorded on the order timeline.
    pub fn timeline_description(self) -> &'static str {
        match self {
            Self::Pending => "Order placed",
            Self::Processing => "Payment confirmed, your order is being prepared",
            Self::Shipped => "Your order has left the warehouse",
            Self::Delivered => "Your order was delivered",
        }
    }
}

/// One status-change record on an order's tracking timeline.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub status: OrderStatus,
    pub timestamp: DateTime<Utc>,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

/// Payment reference kept on the order. Only the card's last four digits
/// are ever persisted.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    #[serde(rename = "type")]
    pub kind: String,
    pub last4: String,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ShippingMethod {
    Standard,
    Express,
    Overnight,
}

/// A placed order. Immutable after creation except for status updates and
/// the timeline appends that accompany them.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i32,
    /// Snapshot of the cart's active lines at checkout time.
    pub items: Vec<CartLine>,
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub shipping_method: ShippingMethod,
    pub status: OrderStatus,
    pub date: DateTime<Utc>,
    pub timeline: Vec<TimelineEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_ranks_follow_tracking_order() {
        assert!(OrderStatus::Pending.canonical_rank() < OrderStatus::Processing.canonical_rank());
        assert!(OrderStatus::Processing.canonical_rank() < OrderStatus::Shipped.canonical_rank());
        assert!(OrderStatus::Shipped.canonical_rank() < OrderStatus::Delivered.canonical_rank());
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!(
            "Shipped".parse::<OrderStatus>().unwrap(),
            OrderStatus::Shipped
        );
        assert_eq!(
            "delivered".parse::<OrderStatus>().unwrap(),
            OrderStatus::Delivered
        );
        assert!("returned".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&OrderStatus::Processing).unwrap();
        assert_eq!(json, "\"processing\"");
    }

    #[test]
    fn payment_method_serializes_type_field() {
        let method = PaymentMethod {
            kind: "card".to_string(),
            last4: "4242".to_string(),
        };
        let json = serde_json::to_value(&method).unwrap();
        assert_eq!(json["type"], "card");
        assert_eq!(json["last4"], "4242");
    }
}
