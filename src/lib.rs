//! Storefront API Library
//!
//! Backend for a small e-commerce storefront: catalog browsing, a
//! shopping cart with save-for-later, a wishlist, and order placement
//! with status tracking. All state except the catalog is in-memory.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod models;
pub mod openapi;
pub mod services;
pub mod store;

use std::sync::Arc;

use axum::{response::Json, routing::get, Router};
use chrono::Utc;
use serde_json::{json, Value};

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<store::MockStore>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: services::AppServices,
}

/// All versioned API routes, nested under `/api/v1` by `main`.
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .nest("/products", handlers::products::products_routes())
        .nest("/cart", handlers::cart::cart_routes())
        .nest("/wishlist", handlers::wishlist::wishlist_routes())
        .nest("/orders", handlers::orders::orders_routes())
}

/// Liveness and build info.
pub async fn status_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Health check. With no external backends there is nothing to probe
/// beyond process liveness.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Root router with the health surface attached.
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { "storefront-api up" }))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .nest("/api/v1", api_v1_routes())
        .merge(openapi::swagger_ui())
}
