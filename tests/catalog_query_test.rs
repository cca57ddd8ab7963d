mod common;

use std::sync::Arc;

use common::{product, sample_catalog, TestApp};
use rand::{rngs::StdRng, SeedableRng};
use rstest::rstest;
use rust_decimal_macros::dec;
use storefront_api::{
    services::catalog::{CatalogService, ProductFilter, SortKey},
    store::MockStore,
};

fn seeded_catalog_service() -> CatalogService {
    let store = Arc::new(MockStore::with_catalog(sample_catalog()));
    CatalogService::with_rng(store, StdRng::seed_from_u64(42))
}

#[tokio::test]
async fn search_is_case_insensitive_across_fields() {
    let app = TestApp::new();
    let catalog = &app.state.services.catalog;

    let by_title = catalog.search("WIRELESS").await;
    assert_eq!(by_title.len(), 1);
    assert_eq!(by_title[0].id, 1);

    // "electronics" only appears in the category field.
    let by_category = catalog.search("electronics").await;
    assert_eq!(by_category.len(), 2);

    assert!(catalog.search("no such thing").await.is_empty());
}

#[tokio::test]
async fn featured_ranks_by_rating_and_truncates() {
    let app = TestApp::new();
    let catalog = &app.state.services.catalog;

    let featured = catalog.get_featured(3).await;
    assert_eq!(featured.len(), 3);
    assert_eq!(featured[0].id, 3); // 4.8
    assert_eq!(featured[1].id, 1); // 4.7
    assert!(featured[0].rating >= featured[1].rating);
    assert!(featured[1].rating >= featured[2].rating);
}

#[tokio::test]
async fn filters_are_conjunctive() {
    let app = TestApp::new();
    let catalog = &app.state.services.catalog;

    let filter = ProductFilter {
        search: None,
        category: Some("Home & Kitchen".into()),
        price_range: Some((dec!(10), dec!(50))),
        min_rating: None,
        in_stock_only: true,
    };
    let results = catalog.filter_products(&filter, None).await;

    // Both Home & Kitchen products are in range, but the mug is out of
    // stock.
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, 3);
}

#[tokio::test]
async fn category_all_matches_everything() {
    let app = TestApp::new();
    let catalog = &app.state.services.catalog;

    let filter = ProductFilter {
        category: Some("all".into()),
        ..Default::default()
    };
    let results = catalog.filter_products(&filter, None).await;
    assert_eq!(results.len(), sample_catalog().len());
}

#[tokio::test]
async fn price_sorts_are_exact_reversals() {
    let app = TestApp::new();
    let catalog = &app.state.services.catalog;
    let filter = ProductFilter::default();

    let ascending = catalog
        .filter_products(&filter, Some(SortKey::PriceLow))
        .await;
    let mut descending = catalog
        .filter_products(&filter, Some(SortKey::PriceHigh))
        .await;
    descending.reverse();

    // All sample prices are distinct, so the orders must mirror exactly.
    let up: Vec<i32> = ascending.iter().map(|p| p.id).collect();
    let down: Vec<i32> = descending.iter().map(|p| p.id).collect();
    assert_eq!(up, down);
    assert!(ascending.windows(2).all(|w| w[0].price <= w[1].price));
}

#[rstest]
#[case("price-low", Some(SortKey::PriceLow))]
#[case("name", Some(SortKey::Name))]
#[case("unknown-key", None)]
#[case("", None)]
fn sort_keys_parse_leniently(#[case] raw: &str, #[case] expected: Option<SortKey>) {
    assert_eq!(SortKey::parse(raw), expected);
}

#[tokio::test]
async fn unsorted_listing_keeps_catalog_order() {
    let app = TestApp::new();
    let catalog = &app.state.services.catalog;

    let results = catalog.filter_products(&ProductFilter::default(), None).await;
    let ids: Vec<i32> = results.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn recommendations_exclude_the_anchor_and_honor_the_limit() {
    let catalog = seeded_catalog_service();

    let recs = catalog.recommendations(1, "bought", 3).await;
    assert_eq!(recs.len(), 3);
    assert!(recs.iter().all(|p| p.id != 1));
}

#[tokio::test]
async fn recommendations_favor_the_anchor_category() {
    // A twin of the anchor scores at least 95 before jitter; the decoy
    // tops out below 20 even with maximal jitter, so the ranking is
    // deterministic regardless of seed.
    let anchor = product(1, "Camera", "Electronics", dec!(100), 4.5);
    let twin = product(2, "Camera Twin", "Electronics", dec!(100), 4.5);
    let mut decoy = product(3, "Garden Gnome", "Garden", dec!(900), 2.0);
    decoy.in_stock = false;

    let store = Arc::new(MockStore::with_catalog(vec![anchor, twin, decoy]));
    let catalog = CatalogService::with_rng(store, StdRng::seed_from_u64(7));

    let recs = catalog.recommendations(1, "bought", 2).await;
    assert_eq!(recs[0].id, 2);
}

#[tokio::test]
async fn unknown_anchor_yields_no_recommendations() {
    let catalog = seeded_catalog_service();
    assert!(catalog.recommendations(999, "bought", 5).await.is_empty());
}

#[tokio::test]
async fn get_all_returns_the_whole_catalog() {
    let app = TestApp::new();
    let all = app.state.services.catalog.get_all().await;
    assert_eq!(all.len(), sample_catalog().len());
}

#[tokio::test]
async fn get_by_category_matches_case_insensitively() {
    let app = TestApp::new();
    let catalog = &app.state.services.catalog;

    let electronics = catalog.get_by_category("electronics").await;
    assert_eq!(electronics.len(), 2);
    assert!(catalog.get_by_category("Garden").await.is_empty());
}

#[tokio::test]
async fn categories_are_distinct_in_catalog_order() {
    let app = TestApp::new();
    let categories = app.state.services.catalog.categories().await;
    assert_eq!(categories, vec!["Electronics", "Home & Kitchen", "Sports"]);
}
