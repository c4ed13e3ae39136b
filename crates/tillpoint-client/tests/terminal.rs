//! Cashier terminal: merge, cart and checkout against the mock backend.

mod common;

use std::time::Duration;

use common::{adjustment, cashier_shell, product, stock_line, MockBackend};
use serde_json::json;
use tillpoint_client::LoadOutcome;
use tillpoint_core::{Money, Notice, NoticeKind, PriceSource};

async fn sugar_backend() -> MockBackend {
    let backend = MockBackend::start().await;
    let sugar = product(10, "Sugar 2kg", 2.50);
    backend
        .reply(
            "GET",
            "/shop-stock/shop/1",
            200,
            json!([stock_line(1, sugar.clone(), 3)]),
        )
        .await;
    backend
        .reply(
            "GET",
            "/pricing-adjustments/shop/1",
            200,
            json!([
                adjustment(1, 10, 2.20, "2024-05-14T09:00:00"),
                adjustment(1, 10, 2.00, "2024-05-15T09:00:00"),
            ]),
        )
        .await;
    backend
        .reply(
            "GET",
            "/products",
            200,
            json!([sugar, product(11, "Salt 1kg", 0.80)]),
        )
        .await;
    backend
}

#[tokio::test]
async fn test_sugar_scenario() {
    let backend = sugar_backend().await;
    backend
        .reply("POST", "/sales/1/9", 200, json!({ "saleId": 77, "totalAmountUSD": 6.0 }))
        .await;
    let shell = cashier_shell(&backend);
    let terminal = shell.terminal();

    assert_eq!(terminal.load().await, Ok(LoadOutcome::Loaded { lines: 2 }));
    let lines = terminal.lines();
    assert_eq!(lines[0].product.product_name, "Sugar 2kg");
    assert_eq!(lines[0].prices().usd, Money::from_cents(200));
    assert!(matches!(lines[0].price_source, PriceSource::Adjusted(Some(_))));
    assert_eq!(lines[1].quantity_in_stock, 0);
    assert!(!lines[1].in_shop);

    for expected in 1..=3 {
        assert_eq!(terminal.add(10), Ok(expected));
    }
    assert_eq!(terminal.totals().usd, Money::from_cents(600));
    assert_eq!(terminal.totals().usd.to_string(), "6.00");

    let notice = terminal.add(10).unwrap_err();
    assert_eq!(notice.title, "Stock Alert");
    assert_eq!(terminal.cart().quantity_of(10), 3);

    let sale = terminal.checkout().await.unwrap();
    assert_eq!(sale.sale_id, Some(77));
    assert!(terminal.cart().is_empty());

    let request = backend.last("POST", "/sales/1/9").await.unwrap();
    assert_eq!(request.authorization.as_deref(), Some("Bearer cashier-token"));
    assert_eq!(
        request.json(),
        json!({
            "paymentMethod": "CASH",
            "saleItems": [{ "product": { "productId": 10 }, "quantity": 3 }]
        })
    );
}

#[tokio::test]
async fn test_empty_cart_checkout_makes_no_call() {
    let backend = sugar_backend().await;
    let shell = cashier_shell(&backend);
    let terminal = shell.terminal();
    terminal.load().await.unwrap();
    let before = backend.requests().await.len();

    let notice = terminal.checkout().await.unwrap_err();

    assert_eq!(notice.kind, NoticeKind::Info);
    assert_eq!(notice.message, "Cart is empty.");
    assert_eq!(backend.requests().await.len(), before);
    assert_eq!(backend.count("POST", "/sales/1/9").await, 0);
}

#[tokio::test]
async fn test_failed_checkout_keeps_cart() {
    let backend = sugar_backend().await;
    backend
        .reply("POST", "/sales/1/9", 500, json!({ "message": "Database unavailable" }))
        .await;
    let shell = cashier_shell(&backend);
    let terminal = shell.terminal();
    terminal.load().await.unwrap();
    terminal.add(10).unwrap();
    terminal.add(10).unwrap();
    let before = terminal.cart();

    let notice = terminal.checkout().await.unwrap_err();

    assert_eq!(notice.kind, NoticeKind::Error);
    assert_eq!(notice.message, "Failed to complete sale.");
    assert_eq!(terminal.cart(), before);
    assert_eq!(terminal.cart().quantity_of(10), 2);

    // The failed attempt does not block a retry.
    let retry = terminal.checkout().await.unwrap_err();
    assert_eq!(retry.message, "Failed to complete sale.");
    assert_eq!(backend.count("POST", "/sales/1/9").await, 2);
}

#[tokio::test]
async fn test_overlapping_checkouts_post_once() {
    let backend = sugar_backend().await;
    backend
        .reply_after(
            "POST",
            "/sales/1/9",
            200,
            json!({ "saleId": 78 }),
            Duration::from_millis(200),
        )
        .await;
    let shell = cashier_shell(&backend);
    let terminal = shell.terminal();
    terminal.load().await.unwrap();
    terminal.add(10).unwrap();

    let (first, second) = tokio::join!(terminal.checkout(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        terminal.checkout().await
    });

    assert_eq!(first.unwrap().sale_id, Some(78));
    assert_eq!(second.unwrap_err(), Notice::checkout_in_progress());
    assert_eq!(backend.count("POST", "/sales/1/9").await, 1);
    assert!(terminal.cart().is_empty());
}

#[tokio::test]
async fn test_units_added_during_checkout_stay_in_cart() {
    let backend = sugar_backend().await;
    backend
        .reply(
            "GET",
            "/shop-stock/shop/1",
            200,
            json!([
                stock_line(1, product(10, "Sugar 2kg", 2.50), 3),
                stock_line(1, product(11, "Salt 1kg", 0.80), 2),
            ]),
        )
        .await;
    backend
        .reply_after(
            "POST",
            "/sales/1/9",
            200,
            json!({ "saleId": 79 }),
            Duration::from_millis(200),
        )
        .await;
    let shell = cashier_shell(&backend);
    let terminal = shell.terminal();
    terminal.load().await.unwrap();
    terminal.add(10).unwrap();
    terminal.add(10).unwrap();

    let (sale, _) = tokio::join!(terminal.checkout(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        terminal.add(10).unwrap();
        terminal.add(11).unwrap();
    });

    assert_eq!(sale.unwrap().sale_id, Some(79));
    let request = backend.last("POST", "/sales/1/9").await.unwrap();
    assert_eq!(
        request.json()["saleItems"],
        json!([{ "product": { "productId": 10 }, "quantity": 2 }])
    );
    let cart = terminal.cart();
    assert_eq!(cart.quantity_of(10), 1);
    assert_eq!(cart.quantity_of(11), 1);
    assert_eq!(cart.lines.len(), 2);
}

#[tokio::test]
async fn test_failed_adjustments_fall_back_to_catalog_prices() {
    let backend = sugar_backend().await;
    backend
        .reply("GET", "/pricing-adjustments/shop/1", 500, json!({ "error": "boom" }))
        .await;
    let shell = cashier_shell(&backend);
    let terminal = shell.terminal();

    assert_eq!(terminal.load().await, Ok(LoadOutcome::Loaded { lines: 2 }));
    let sugar = terminal.lines().into_iter().find(|l| l.product_id() == 10).unwrap();
    assert_eq!(sugar.prices().usd, Money::from_cents(250));
    assert_eq!(sugar.price_source, PriceSource::Catalog);
}

#[tokio::test]
async fn test_failed_stock_fetch_keeps_previous_list() {
    let backend = sugar_backend().await;
    let shell = cashier_shell(&backend);
    let terminal = shell.terminal();
    terminal.load().await.unwrap();
    let before = terminal.lines();

    backend
        .reply("GET", "/shop-stock/shop/1", 500, json!({ "error": "boom" }))
        .await;
    let notice = terminal.load().await.unwrap_err();

    assert_eq!(notice.kind, NoticeKind::Error);
    assert_eq!(notice.message, "Failed to load shop stock.");
    assert_eq!(terminal.lines(), before);
}

#[tokio::test]
async fn test_merge_for_previous_shop_is_discarded() {
    let backend = sugar_backend().await;
    backend
        .reply_after(
            "GET",
            "/products",
            200,
            json!([product(10, "Sugar 2kg", 2.50)]),
            Duration::from_millis(300),
        )
        .await;
    let shell = cashier_shell(&backend);
    let terminal = shell.terminal();

    let (outcome, _) = tokio::join!(terminal.load(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        terminal.select_shop(2)
    });

    assert_eq!(outcome, Ok(LoadOutcome::Stale));
    assert!(terminal.lines().is_empty());
    assert_eq!(terminal.selection().shop_id, Some(2));
}

#[tokio::test]
async fn test_failed_fetch_for_previous_shop_is_discarded() {
    let backend = sugar_backend().await;
    backend
        .reply_after(
            "GET",
            "/shop-stock/shop/1",
            500,
            json!({ "error": "boom" }),
            Duration::from_millis(300),
        )
        .await;
    let shell = cashier_shell(&backend);
    let terminal = shell.terminal();

    let (outcome, _) = tokio::join!(terminal.load(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        terminal.select_shop(2)
    });

    assert_eq!(outcome, Ok(LoadOutcome::Stale));
    assert!(terminal.lines().is_empty());
    assert_eq!(terminal.selection().shop_id, Some(2));
}
