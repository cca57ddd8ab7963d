mod common;

use common::TestApp;
use proptest::prelude::*;
use storefront_api::models::CartLine;

#[tokio::test]
async fn adding_same_product_twice_increments_one_line() {
    let app = TestApp::new();
    let cart = &app.state.services.cart;

    cart.add_item(1, 2).await;
    let lines = cart.add_item(1, 3).await;

    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0], CartLine::new(1, 5));
}

#[tokio::test]
async fn distinct_products_get_distinct_lines() {
    let app = TestApp::new();
    let cart = &app.state.services.cart;

    cart.add_item(1, 1).await;
    let lines = cart.add_item(2, 1).await;

    assert_eq!(lines.len(), 2);
    assert!(lines.iter().any(|l| l.product_id == 1));
    assert!(lines.iter().any(|l| l.product_id == 2));
}

#[tokio::test]
async fn count_excludes_saved_for_later_lines() {
    let app = TestApp::new();
    let cart = &app.state.services.cart;

    cart.add_item(1, 2).await;
    cart.add_item(2, 3).await;
    assert_eq!(cart.cart_count().await, 5);

    cart.save_for_later(2).await;
    assert_eq!(cart.cart_count().await, 2);

    // The line itself is still in the cart, just flagged.
    let lines = cart.get_cart_items().await;
    assert_eq!(lines.len(), 2);
    assert!(lines
        .iter()
        .find(|l| l.product_id == 2)
        .is_some_and(|l| l.saved_for_later));
}

#[tokio::test]
async fn move_to_cart_restores_the_line() {
    let app = TestApp::new();
    let cart = &app.state.services.cart;

    cart.add_item(3, 1).await;
    cart.save_for_later(3).await;
    assert_eq!(cart.cart_count().await, 0);

    let lines = cart.move_to_cart(3).await;
    assert!(!lines[0].saved_for_later);
    assert_eq!(cart.cart_count().await, 1);
}

#[tokio::test]
async fn update_quantity_replaces_instead_of_adding() {
    let app = TestApp::new();
    let cart = &app.state.services.cart;

    cart.add_item(1, 5).await;
    let lines = cart.update_quantity(1, 2).await;

    assert_eq!(lines[0].quantity, 2);
}

#[tokio::test]
async fn update_quantity_on_absent_product_is_a_noop() {
    let app = TestApp::new();
    let cart = &app.state.services.cart;

    cart.add_item(1, 1).await;
    let lines = cart.update_quantity(99, 4).await;

    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0], CartLine::new(1, 1));
}

#[tokio::test]
async fn remove_is_idempotent() {
    let app = TestApp::new();
    let cart = &app.state.services.cart;

    cart.add_item(1, 1).await;
    cart.remove_item(1).await;
    let lines = cart.remove_item(1).await;

    assert!(lines.is_empty());
}

#[tokio::test]
async fn clear_drops_saved_for_later_lines_too() {
    let app = TestApp::new();
    let cart = &app.state.services.cart;

    cart.add_item(1, 1).await;
    cart.add_item(2, 1).await;
    cart.save_for_later(2).await;

    let lines = cart.clear_cart().await;
    assert!(lines.is_empty());
    assert!(cart.get_cart_items().await.is_empty());
}

proptest! {
    // One line per product and an exact active count, no matter how adds
    // and saves interleave.
    #[test]
    fn cart_lines_stay_unique_under_arbitrary_adds(
        ops in prop::collection::vec((1..6i32, 1..10i32, any::<bool>()), 1..25)
    ) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let app = TestApp::new();
            let cart = &app.state.services.cart;

            for (product_id, quantity, save) in &ops {
                cart.add_item(*product_id, *quantity).await;
                if *save {
                    cart.save_for_later(*product_id).await;
                }
            }

            let lines = cart.get_cart_items().await;
            let mut seen = std::collections::HashSet::new();
            for line in &lines {
                assert!(seen.insert(line.product_id));
            }

            let expected: i32 = lines
                .iter()
                .filter(|l| !l.saved_for_later)
                .map(|l| l.quantity)
                .sum();
            assert_eq!(cart.cart_count().await, expected);
        });
    }
}
