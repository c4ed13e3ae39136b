//! Login, role routing and write-failure notices against the mock backend.

mod common;

use common::{cashier_shell, shell_for, MockBackend};
use serde_json::json;
use tillpoint_client::services::{ExpenseCategory, Shop, TransferRequest};
use tillpoint_core::{NoticeKind, Role, WriteAction};

#[tokio::test]
async fn test_login_writes_session_and_routes_by_role() {
    let backend = MockBackend::start().await;
    backend
        .reply(
            "POST",
            "/users/login",
            200,
            json!({
                "token": "jwt-abc",
                "username": "boss",
                "fullName": "The Boss",
                "roles": ["ROLE_CASHIER", "ROLE_ADMIN"],
                "userId": 1
            }),
        )
        .await;
    let shell = shell_for(&backend);

    let landed = shell.login(" boss ", "pw").await.unwrap();

    assert_eq!(landed.location, "/dashboard");
    let welcome = landed.notice.unwrap();
    assert_eq!(welcome.kind, NoticeKind::Success);
    assert_eq!(welcome.message, "Logged in as The Boss");

    let session = shell.session();
    assert_eq!(session.token.as_deref(), Some("jwt-abc"));
    assert!(session.roles.contains(&Role::Admin));
    assert_eq!(session.shop_id, None);

    let request = backend.last("POST", "/users/login").await.unwrap();
    assert_eq!(request.json(), json!({ "username": "boss", "password": "pw" }));
}

#[tokio::test]
async fn test_login_failure_shows_backend_text() {
    let backend = MockBackend::start().await;
    backend
        .reply("POST", "/users/login", 403, json!({ "error": "Account disabled" }))
        .await;
    let shell = shell_for(&backend);

    let notice = shell.login("jdoe", "pw").await.unwrap_err();
    assert_eq!(notice.message, "Account disabled");
    assert!(!shell.session().is_authenticated());
}

#[tokio::test]
async fn test_login_bad_credentials() {
    let backend = MockBackend::start().await;
    backend.reply("POST", "/users/login", 401, json!({})).await;
    let shell = shell_for(&backend);

    let notice = shell.login("jdoe", "wrong").await.unwrap_err();
    assert_eq!(notice.message, "Invalid username or password.");
    assert_eq!(shell.location(), "/login");
}

#[tokio::test]
async fn test_guard_after_login() {
    let backend = MockBackend::start().await;
    let shell = cashier_shell(&backend);

    assert_eq!(shell.navigate("/cashier").location, "/cashier");
    let denied = shell.navigate("/settings/users");
    assert_eq!(denied.location, "/cashier");
    assert_eq!(denied.notice.unwrap().title, "Access Denied");

    let labels: Vec<_> = shell.menu().iter().map(|m| m.label).collect();
    assert_eq!(labels, ["Expenses", "Cashier POS", "Sales History"]);
    assert!(backend.requests().await.is_empty());
}

#[tokio::test]
async fn test_insufficient_transfer_notice() {
    let backend = MockBackend::start().await;
    backend
        .reply(
            "POST",
            "/stock-transfers",
            400,
            json!({ "message": "Insufficient stock in source shop" }),
        )
        .await;
    let shell = cashier_shell(&backend);

    let err = shell
        .api()
        .stock()
        .create_transfer(TransferRequest {
            from_shop_id: 1,
            to_shop_id: 2,
            product_id: 10,
            quantity: 50,
        })
        .await
        .unwrap_err();
    let notice = err.notice(WriteAction::StockTransfer);
    assert_eq!(notice.kind, NoticeKind::Warning);
    assert_eq!(notice.title, "Insufficient Stock");

    let request = backend.last("POST", "/stock-transfers").await.unwrap();
    let query = request.query.unwrap();
    assert!(query.contains("fromShopId=1"));
    assert!(query.contains("quantity=50"));
}

#[tokio::test]
async fn test_same_shop_transfer_never_sent() {
    let backend = MockBackend::start().await;
    let shell = cashier_shell(&backend);

    let err = shell
        .api()
        .stock()
        .create_transfer(TransferRequest {
            from_shop_id: 1,
            to_shop_id: 1,
            product_id: 10,
            quantity: 5,
        })
        .await
        .unwrap_err();
    assert_eq!(err.notice(WriteAction::StockTransfer).title, "Missing Info");
    assert!(backend.requests().await.is_empty());
}

#[tokio::test]
async fn test_duplicate_notices() {
    let backend = MockBackend::start().await;
    backend.reply("POST", "/shops", 409, json!({ "message": "exists" })).await;
    backend
        .reply("POST", "/expense-categories", 500, json!({ "error": "constraint" }))
        .await;
    let shell = cashier_shell(&backend);

    let shop = Shop {
        id: None,
        shop_name: "Main".into(),
        location: None,
        contact_number: None,
    };
    let err = shell.api().shops().create(&shop).await.unwrap_err();
    assert_eq!(err.notice(WriteAction::ShopSave).title, "Duplicate Shop");

    let category = ExpenseCategory {
        id: None,
        name: "Rent".into(),
        description: None,
    };
    let err = shell.api().expenses().create_category(&category).await.unwrap_err();
    assert_eq!(err.notice(WriteAction::ExpenseCategorySave).title, "Duplicate!");
}
