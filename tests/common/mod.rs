// Not every suite uses every helper.
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::{Duration as ChronoDuration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;
use storefront_api::{
    config::AppConfig,
    events::{self, EventSender},
    models::Product,
    services::AppServices,
    store::MockStore,
    AppState,
};
use tokio::sync::mpsc;
use tower::ServiceExt;

/// Test harness over a fresh in-memory store with a fixed catalog and no
/// simulated latency.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_catalog(sample_catalog())
    }

    pub fn with_catalog(catalog: Vec<Product>) -> Self {
        let cfg = test_config();
        let store = Arc::new(MockStore::with_catalog(catalog));

        let (event_tx, event_rx) = mpsc::channel(cfg.event_channel_capacity);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let services = AppServices::new(
            store.clone(),
            Arc::new(event_sender.clone()),
            storefront_api::services::orders::PricingConfig::from(&cfg),
        );

        let state = AppState {
            store,
            config: cfg,
            event_sender,
            services,
        };

        let router = storefront_api::app_routes().with_state(state.clone());

        Self {
            router,
            state,
            _event_task: event_task,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                builder.body(Body::from(json.to_string())).unwrap()
            }
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("request should not fail at the transport level");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("response body should be JSON")
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".into(),
        port: 18080,
        environment: "test".into(),
        log_level: "warn".into(),
        log_json: false,
        simulated_latency_ms: 0,
        default_tax_rate: 0.08,
        free_shipping_threshold: 50.0,
        shipping_rate_standard: 9.99,
        shipping_rate_express: 19.99,
        shipping_rate_overnight: 29.99,
        featured_limit: 8,
        recommendation_limit: 8,
        event_channel_capacity: 64,
        cors_allowed_origins: None,
        request_timeout_secs: 30,
    }
}

pub fn product(id: i32, title: &str, category: &str, price: Decimal, rating: f32) -> Product {
    Product {
        id,
        title: title.to_string(),
        description: format!("{} description", title),
        category: category.to_string(),
        price,
        original_price: None,
        rating,
        review_count: 10,
        images: vec![format!("https://images.example.com/{}.jpg", id)],
        in_stock: true,
        discount: None,
        date_added: Utc::now() - ChronoDuration::days(i64::from(id)),
    }
}

/// Small fixed catalog spanning two categories and the free-shipping
/// threshold.
pub fn sample_catalog() -> Vec<Product> {
    let mut out_of_stock = product(4, "Ceramic Mug", "Home & Kitchen", dec!(12.50), 4.0);
    out_of_stock.in_stock = false;

    vec![
        product(1, "Wireless Headphones", "Electronics", dec!(89.99), 4.7),
        product(2, "USB-C Charger", "Electronics", dec!(24.99), 4.2),
        product(3, "Chef Knife", "Home & Kitchen", dec!(45.00), 4.8),
        out_of_stock,
        product(5, "Yoga Mat", "Sports", dec!(29.99), 3.9),
    ]
}
