use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use tracing::warn;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::{
    errors::ServiceError,
    handlers::common::{created_response, success_response, validate_input},
    models::{OrderStatus, PaymentMethod, ShippingAddress, ShippingMethod},
    services::orders::CreateOrderInput,
    AppState,
};

/// Creates the router for order endpoints
pub fn orders_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders))
        .route("/checkout", post(checkout))
        .route("/:id", get(get_order))
        .route("/:id/status", put(update_status))
        .route("/:id/timeline", get(get_timeline))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutAddress {
    #[validate(length(min = 1))]
    pub first_name: String,
    #[validate(length(min = 1))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 7))]
    pub phone: String,
    #[validate(length(min = 1))]
    pub address: String,
    #[validate(length(min = 1))]
    pub city: String,
    #[validate(length(min = 1))]
    pub state: String,
    #[validate(length(min = 3))]
    pub zip_code: String,
}

impl From<CheckoutAddress> for ShippingAddress {
    fn from(a: CheckoutAddress) -> Self {
        Self {
            first_name: a.first_name,
            last_name: a.last_name,
            email: a.email,
            phone: a.phone,
            address: a.address,
            city: a.city,
            state: a.state,
            zip_code: a.zip_code,
        }
    }
}

fn validate_card_number(card_number: &str) -> Result<(), ValidationError> {
    let digits: String = card_number.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.len() < 12 || digits.len() > 19 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::new("card_number"));
    }
    Ok(())
}

/// Checkout payload. The card number is validated and immediately reduced
/// to its last four digits; the full number is never stored.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[validate]
    pub shipping_address: CheckoutAddress,
    #[validate(custom = "validate_card_number")]
    pub card_number: String,
    /// standard, express, or overnight
    pub shipping_method: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// All orders, oldest first
#[utoipa::path(
    get,
    path = "/api/v1/orders",
    responses((status = 200, description = "Orders", body = Vec<crate::models::Order>)),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    Ok(success_response(state.services.orders.get_all().await))
}

/// Place an order from the cart's active lines, then empty the cart
#[utoipa::path(
    post,
    path = "/api/v1/orders/checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Order placed", body = crate::models::Order),
        (status = 400, description = "Invalid payload or empty cart", body = crate::errors::ErrorResponse)
    ),
    tag = "Orders"
)]
pub async fn checkout(
    State(state): State<AppState>,
    Json(payload): Json<CheckoutRequest>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    validate_input(&payload)?;

    let shipping_method: ShippingMethod = payload.shipping_method.parse().map_err(|_| {
        ServiceError::ValidationError(format!(
            "Unknown shipping method '{}'",
            payload.shipping_method
        ))
    })?;

    let digits: String = payload
        .card_number
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    let last4 = digits[digits.len() - 4..].to_string();

    let items = state.services.cart.get_cart_items().await;
    let order = state
        .services
        .orders
        .create(CreateOrderInput {
            items,
            shipping_address: payload.shipping_address.into(),
            payment_method: PaymentMethod {
                kind: "card".to_string(),
                last4,
            },
            shipping_method,
        })
        .await?;

    // Deliberately a second step: a failure here leaves the order placed
    // and the cart intact, which the client resolves by clearing again.
    let cleared = state.services.cart.clear_cart().await;
    if !cleared.is_empty() {
        warn!(order_id = order.id, "Cart not empty after checkout clear");
    }

    Ok(created_response(order))
}

/// Get an order by id
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    params(("id" = i32, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order found", body = crate::models::Order),
        (status = 404, description = "Unknown order", body = crate::errors::ErrorResponse)
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let order = state
        .services
        .orders
        .get_by_id(id)
        .await
        .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", id)))?;
    Ok(success_response(order))
}

/// Advance (or replay) an order's status
#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}/status",
    params(("id" = i32, Path, description = "Order id")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Updated order", body = crate::models::Order),
        (status = 404, description = "Unknown order", body = crate::errors::ErrorResponse)
    ),
    tag = "Orders"
)]
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let order = state
        .services
        .orders
        .update_status(id, payload.status)
        .await
        .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", id)))?;
    Ok(success_response(order))
}

/// An order's tracking timeline
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}/timeline",
    params(("id" = i32, Path, description = "Order id")),
    responses(
        (status = 200, description = "Timeline entries", body = Vec<crate::models::TimelineEntry>)
    ),
    tag = "Orders"
)]
pub async fn get_timeline(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    Ok(success_response(
        state.services.orders.order_timeline(id).await,
    ))
}
