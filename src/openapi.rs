use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storefront API",
        version = "1.0.0",
        description = r#"
# Storefront API

Backend for a small e-commerce storefront: product catalog browsing with
compound filtering, a shopping cart with save-for-later, a wishlist, and
order placement with status tracking.

All state except the catalog lives in memory and resets on restart.

## Error Handling

Errors use a consistent response shape with appropriate HTTP status codes:

```json
{
  "error": "Bad Request",
  "message": "Validation failed",
  "timestamp": "2024-01-01T00:00:00Z"
}
```
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "Products", description = "Catalog browsing and recommendations"),
        (name = "Cart", description = "Shopping cart endpoints"),
        (name = "Wishlist", description = "Wishlist endpoints"),
        (name = "Orders", description = "Checkout and order tracking"),
        (name = "Health", description = "Health check endpoints")
    ),
    paths(
        // Products
        crate::handlers::products::list_products,
        crate::handlers::products::featured_products,
        crate::handlers::products::list_categories,
        crate::handlers::products::search_products,
        crate::handlers::products::get_product,
        crate::handlers::products::get_recommendations,

        // Cart
        crate::handlers::cart::get_cart,
        crate::handlers::cart::get_cart_count,
        crate::handlers::cart::add_item,
        crate::handlers::cart::update_quantity,
        crate::handlers::cart::remove_item,
        crate::handlers::cart::save_for_later,
        crate::handlers::cart::move_to_cart,
        crate::handlers::cart::clear_cart,

        // Wishlist
        crate::handlers::wishlist::get_wishlist,
        crate::handlers::wishlist::add_to_wishlist,
        crate::handlers::wishlist::get_wishlist_count,
        crate::handlers::wishlist::toggle_wishlist,
        crate::handlers::wishlist::contains,
        crate::handlers::wishlist::remove_from_wishlist,
        crate::handlers::wishlist::clear_wishlist,

        // Orders
        crate::handlers::orders::list_orders,
        crate::handlers::orders::checkout,
        crate::handlers::orders::get_order,
        crate::handlers::orders::update_status,
        crate::handlers::orders::get_timeline,
    ),
    components(
        schemas(
            crate::models::Product,
            crate::models::CartLine,
            crate::models::WishlistEntry,
            crate::models::Order,
            crate::models::OrderStatus,
            crate::models::TimelineEntry,
            crate::models::ShippingAddress,
            crate::models::PaymentMethod,
            crate::models::ShippingMethod,

            crate::handlers::cart::AddItemRequest,
            crate::handlers::cart::UpdateQuantityRequest,
            crate::handlers::cart::CartCountResponse,
            crate::handlers::wishlist::WishlistItemRequest,
            crate::handlers::wishlist::WishlistCountResponse,
            crate::handlers::wishlist::WishlistMembershipResponse,
            crate::handlers::orders::CheckoutRequest,
            crate::handlers::orders::CheckoutAddress,
            crate::handlers::orders::UpdateStatusRequest,

            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_generates() {
        let openapi = ApiDocV1::openapi();
        let json = serde_json::to_string(&openapi).unwrap();
        assert!(json.contains("Storefront API"));
        assert!(json.contains("/api/v1/products"));
        assert!(json.contains("/api/v1/orders/checkout"));
    }
}
