use axum::{
    extract::{Path, Query, State},
    routing::get,
    Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    errors::ServiceError,
    handlers::common::success_response,
    services::catalog::{ProductFilter, SortKey},
    AppState,
};

/// Creates the router for product endpoints
pub fn products_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/featured", get(featured_products))
        .route("/categories", get(list_categories))
        .route("/search", get(search_products))
        .route("/:id", get(get_product))
        .route("/:id/recommendations", get(get_recommendations))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ProductListQuery {
    /// Case-insensitive substring search over title/description/category
    pub search: Option<String>,
    /// Category filter; "all" or absent matches every category
    pub category: Option<String>,
    /// Inclusive lower price bound
    pub min_price: Option<Decimal>,
    /// Inclusive upper price bound
    pub max_price: Option<Decimal>,
    /// Minimum rating threshold
    pub min_rating: Option<f32>,
    /// Keep only in-stock products
    #[serde(default)]
    pub in_stock: bool,
    /// Sort key: price-low, price-high, rating, newest, name.
    /// Unknown keys leave the catalog order untouched.
    pub sort: Option<String>,
}

/// List products with compound filtering and a single sort pass
#[utoipa::path(
    get,
    path = "/api/v1/products",
    params(ProductListQuery),
    responses(
        (status = 200, description = "Filtered product listing", body = Vec<crate::models::Product>)
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    if let (Some(min), Some(max)) = (query.min_price, query.max_price) {
        if min > max {
            return Err(ServiceError::ValidationError(
                "min_price cannot exceed max_price".to_string(),
            ));
        }
    }

    let price_range = match (query.min_price, query.max_price) {
        (None, None) => None,
        (min, max) => Some((min.unwrap_or(Decimal::ZERO), max.unwrap_or(Decimal::MAX))),
    };

    let filter = ProductFilter {
        search: query.search,
        category: query.category,
        price_range,
        min_rating: query.min_rating,
        in_stock_only: query.in_stock,
    };
    let sort = query.sort.as_deref().and_then(SortKey::parse);

    let products = state.services.catalog.filter_products(&filter, sort).await;
    Ok(success_response(products))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct FeaturedQuery {
    /// Number of products to return; defaults from configuration
    pub limit: Option<usize>,
}

/// Top-rated products
#[utoipa::path(
    get,
    path = "/api/v1/products/featured",
    params(FeaturedQuery),
    responses(
        (status = 200, description = "Featured products", body = Vec<crate::models::Product>)
    ),
    tag = "Products"
)]
pub async fn featured_products(
    State(state): State<AppState>,
    Query(query): Query<FeaturedQuery>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let limit = query.limit.unwrap_or(state.config.featured_limit);
    let products = state.services.catalog.get_featured(limit).await;
    Ok(success_response(products))
}

/// Distinct catalog categories
#[utoipa::path(
    get,
    path = "/api/v1/products/categories",
    responses((status = 200, description = "Catalog categories", body = Vec<String>)),
    tag = "Products"
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let categories = state.services.catalog.categories().await;
    Ok(success_response(categories))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Search term
    pub q: String,
}

/// Full-catalog substring search
#[utoipa::path(
    get,
    path = "/api/v1/products/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching products", body = Vec<crate::models::Product>)
    ),
    tag = "Products"
)]
pub async fn search_products(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let products = state.services.catalog.search(&query.q).await;
    Ok(success_response(products))
}

/// Get a product by id
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product found", body = crate::models::Product),
        (status = 404, description = "Unknown product", body = crate::errors::ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let product = state
        .services
        .catalog
        .get_by_id(id)
        .await
        .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", id)))?;
    Ok(success_response(product))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct RecommendationQuery {
    /// Recommendation flavor; currently only "bought" is produced
    pub kind: Option<String>,
    /// Maximum number of recommendations
    pub limit: Option<usize>,
}

/// "Bought together" recommendations for a product
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}/recommendations",
    params(("id" = i32, Path, description = "Anchor product id"), RecommendationQuery),
    responses(
        (status = 200, description = "Recommended products", body = Vec<crate::models::Product>)
    ),
    tag = "Products"
)]
pub async fn get_recommendations(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<RecommendationQuery>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let kind = query.kind.as_deref().unwrap_or("bought");
    let limit = query.limit.unwrap_or(state.config.recommendation_limit);
    let products = state.services.catalog.recommendations(id, kind, limit).await;
    Ok(success_response(products))
}
