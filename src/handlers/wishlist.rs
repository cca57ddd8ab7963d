use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{errors::ServiceError, handlers::common::success_response, AppState};

/// Creates the router for wishlist endpoints
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_wishlist))
        .route("/", post(add_to_wishlist))
        .route("/count", get(get_wishlist_count))
        .route("/toggle", post(toggle_wishlist))
        .route("/contains/:product_id", get(contains))
        .route("/:product_id", delete(remove_from_wishlist))
        .route("/clear", post(clear_wishlist))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItemRequest {
    pub product_id: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WishlistCountResponse {
    pub count: usize,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WishlistMembershipResponse {
    pub product_id: i32,
    pub in_wishlist: bool,
}

/// All wishlist entries
#[utoipa::path(
    get,
    path = "/api/v1/wishlist",
    responses(
        (status = 200, description = "Wishlist entries", body = Vec<crate::models::WishlistEntry>)
    ),
    tag = "Wishlist"
)]
pub async fn get_wishlist(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    Ok(success_response(state.services.wishlist.get_all().await))
}

/// Add a product to the wishlist (no-op when already present)
#[utoipa::path(
    post,
    path = "/api/v1/wishlist",
    request_body = WishlistItemRequest,
    responses(
        (status = 200, description = "Updated wishlist", body = Vec<crate::models::WishlistEntry>),
        (status = 400, description = "Invalid product id", body = crate::errors::ErrorResponse)
    ),
    tag = "Wishlist"
)]
pub async fn add_to_wishlist(
    State(state): State<AppState>,
    Json(payload): Json<WishlistItemRequest>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let wishlist = state.services.wishlist.add(payload.product_id).await?;
    Ok(success_response(wishlist))
}

/// Number of wishlist entries
#[utoipa::path(
    get,
    path = "/api/v1/wishlist/count",
    responses((status = 200, description = "Wishlist count", body = WishlistCountResponse)),
    tag = "Wishlist"
)]
pub async fn get_wishlist_count(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let count = state.services.wishlist.count().await;
    Ok(success_response(WishlistCountResponse { count }))
}

/// Flip a product's wishlist membership and report the result
#[utoipa::path(
    post,
    path = "/api/v1/wishlist/toggle",
    request_body = WishlistItemRequest,
    responses(
        (status = 200, description = "Resulting membership", body = WishlistMembershipResponse),
        (status = 400, description = "Invalid product id", body = crate::errors::ErrorResponse)
    ),
    tag = "Wishlist"
)]
pub async fn toggle_wishlist(
    State(state): State<AppState>,
    Json(payload): Json<WishlistItemRequest>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let in_wishlist = state.services.wishlist.toggle(payload.product_id).await?;
    Ok(success_response(WishlistMembershipResponse {
        product_id: payload.product_id,
        in_wishlist,
    }))
}

/// Membership check; invalid ids read as not-in-wishlist
#[utoipa::path(
    get,
    path = "/api/v1/wishlist/contains/{product_id}",
    params(("product_id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Membership", body = WishlistMembershipResponse)
    ),
    tag = "Wishlist"
)]
pub async fn contains(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let in_wishlist = state.services.wishlist.contains(product_id).await;
    Ok(success_response(WishlistMembershipResponse {
        product_id,
        in_wishlist,
    }))
}

/// Remove a product from the wishlist (idempotent)
#[utoipa::path(
    delete,
    path = "/api/v1/wishlist/{product_id}",
    params(("product_id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Updated wishlist", body = Vec<crate::models::WishlistEntry>),
        (status = 400, description = "Invalid product id", body = crate::errors::ErrorResponse)
    ),
    tag = "Wishlist"
)]
pub async fn remove_from_wishlist(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let wishlist = state.services.wishlist.remove(product_id).await?;
    Ok(success_response(wishlist))
}

/// Empty the wishlist
#[utoipa::path(
    post,
    path = "/api/v1/wishlist/clear",
    responses(
        (status = 200, description = "Emptied wishlist", body = Vec<crate::models::WishlistEntry>)
    ),
    tag = "Wishlist"
)]
pub async fn clear_wishlist(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    Ok(success_response(state.services.wishlist.clear().await))
}
