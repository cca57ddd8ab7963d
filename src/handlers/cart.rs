use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    errors::ServiceError,
    handlers::common::{success_response, validate_input},
    AppState,
};

/// Creates the router for cart endpoints
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_cart))
        .route("/count", get(get_cart_count))
        .route("/items", post(add_item))
        .route("/items/:product_id", put(update_quantity))
        .route("/items/:product_id", delete(remove_item))
        .route("/items/:product_id/save-for-later", post(save_for_later))
        .route("/items/:product_id/move-to-cart", post(move_to_cart))
        .route("/clear", post(clear_cart))
}

fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: i32,
    /// The storefront UI caps line quantities at 10
    #[serde(default = "default_quantity")]
    #[validate(range(min = 1, max = 10))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateQuantityRequest {
    #[validate(range(min = 1, max = 10))]
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartCountResponse {
    pub count: i32,
}

/// Current cart snapshot, saved-for-later lines included
#[utoipa::path(
    get,
    path = "/api/v1/cart",
    responses(
        (status = 200, description = "Cart lines", body = Vec<crate::models::CartLine>)
    ),
    tag = "Cart"
)]
pub async fn get_cart(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    Ok(success_response(state.services.cart.get_cart_items().await))
}

/// Badge count of active line quantities
#[utoipa::path(
    get,
    path = "/api/v1/cart/count",
    responses((status = 200, description = "Cart count", body = CartCountResponse)),
    tag = "Cart"
)]
pub async fn get_cart_count(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let count = state.services.cart.cart_count().await;
    Ok(success_response(CartCountResponse { count }))
}

/// Add a product to the cart (or bump its quantity)
#[utoipa::path(
    post,
    path = "/api/v1/cart/items",
    request_body = AddItemRequest,
    responses(
        (status = 200, description = "Updated cart", body = Vec<crate::models::CartLine>),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse)
    ),
    tag = "Cart"
)]
pub async fn add_item(
    State(state): State<AppState>,
    Json(payload): Json<AddItemRequest>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    validate_input(&payload)?;

    let cart = state
        .services
        .cart
        .add_item(payload.product_id, payload.quantity)
        .await;
    Ok(success_response(cart))
}

/// Set a line's quantity directly
#[utoipa::path(
    put,
    path = "/api/v1/cart/items/{product_id}",
    params(("product_id" = i32, Path, description = "Product id")),
    request_body = UpdateQuantityRequest,
    responses(
        (status = 200, description = "Updated cart", body = Vec<crate::models::CartLine>),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse)
    ),
    tag = "Cart"
)]
pub async fn update_quantity(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
    Json(payload): Json<UpdateQuantityRequest>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    validate_input(&payload)?;

    let cart = state
        .services
        .cart
        .update_quantity(product_id, payload.quantity)
        .await;
    Ok(success_response(cart))
}

/// Remove a line from the cart (idempotent)
#[utoipa::path(
    delete,
    path = "/api/v1/cart/items/{product_id}",
    params(("product_id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Updated cart", body = Vec<crate::models::CartLine>)
    ),
    tag = "Cart"
)]
pub async fn remove_item(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    Ok(success_response(
        state.services.cart.remove_item(product_id).await,
    ))
}

/// Flag a line as saved for later
#[utoipa::path(
    post,
    path = "/api/v1/cart/items/{product_id}/save-for-later",
    params(("product_id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Updated cart", body = Vec<crate::models::CartLine>)
    ),
    tag = "Cart"
)]
pub async fn save_for_later(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    Ok(success_response(
        state.services.cart.save_for_later(product_id).await,
    ))
}

/// Move a saved-for-later line back into the active cart
#[utoipa::path(
    post,
    path = "/api/v1/cart/items/{product_id}/move-to-cart",
    params(("product_id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Updated cart", body = Vec<crate::models::CartLine>)
    ),
    tag = "Cart"
)]
pub async fn move_to_cart(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    Ok(success_response(
        state.services.cart.move_to_cart(product_id).await,
    ))
}

/// Empty the cart, saved-for-later lines included
#[utoipa::path(
    post,
    path = "/api/v1/cart/clear",
    responses(
        (status = 200, description = "Emptied cart", body = Vec<crate::models::CartLine>)
    ),
    tag = "Cart"
)]
pub async fn clear_cart(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    Ok(success_response(state.services.cart.clear_cart().await))
}
