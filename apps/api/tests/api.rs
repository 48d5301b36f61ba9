//! End-to-end tests against the full router and an in-memory database.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use salesflow_api::{build_router, ApiConfig, AppState};
use salesflow_db::{Database, DbConfig};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn app() -> Router {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    build_router(AppState::new(db, ApiConfig::default()))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>, token: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_product(app: &Router, sku: &str, stock: i64, min: i64) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/products",
        Some(json!({
            "name": "Desk Lamp",
            "sku": sku,
            "priceCents": 2500,
            "costCents": 1500,
            "stockQuantity": stock,
            "minStockLevel": min,
        })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body
}

#[tokio::test]
async fn test_health() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], true);
}

#[tokio::test]
async fn test_create_product_returns_camel_case() {
    let app = app().await;
    let body = create_product(&app, "lamp-01", 10, 3).await;

    assert_eq!(body["sku"], "LAMP-01");
    assert_eq!(body["priceCents"], 2500);
    assert_eq!(body["stockQuantity"], 10);
    assert_eq!(body["isActive"], true);
    assert_eq!(body["profitMargin"], 0.4);

    let id = body["id"].as_str().unwrap();
    let (status, fetched) = send(&app, Method::GET, &format!("/api/products/{}", id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], body["id"]);
}

#[tokio::test]
async fn test_duplicate_sku_is_conflict() {
    let app = app().await;
    create_product(&app, "LAMP-01", 1, 0).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/products",
        Some(json!({ "name": "Other", "sku": "lamp-01", "priceCents": 100 })),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/api/products/missing", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_delete_hides_product_from_listing() {
    let app = app().await;
    let product = create_product(&app, "LAMP-01", 1, 0).await;
    let id = product["id"].as_str().unwrap();

    let (status, body) = send(&app, Method::DELETE, &format!("/api/products/{}", id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product deleted successfully");

    let (_, list) = send(&app, Method::GET, "/api/products", None, None).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_sale_decrements_stock_and_flags_low_stock() {
    let app = app().await;
    let product = create_product(&app, "LAMP-01", 10, 3).await;
    let id = product["id"].as_str().unwrap();

    let (status, sale) = send(
        &app,
        Method::POST,
        "/api/sales",
        Some(json!({
            "items": [{ "product": id, "quantity": 7 }],
            "paymentMethod": "Cash",
            "salesperson": "Ama",
        })),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "{}", sale);
    assert_eq!(sale["saleNumber"], "SALE-000001");
    assert_eq!(sale["totalAmountCents"], 17_500);
    assert_eq!(sale["remainingDebtCents"], 0);
    assert_eq!(sale["items"][0]["productSku"], "LAMP-01");

    let (_, low) = send(&app, Method::GET, "/api/inventory/low-stock", None, None).await;
    let low = low.as_array().unwrap();
    assert_eq!(low.len(), 1);
    assert_eq!(low[0]["currentStock"], 3);
    assert_eq!(low[0]["lowStockAlert"], true);
}

#[tokio::test]
async fn test_oversell_is_rejected() {
    let app = app().await;
    let product = create_product(&app, "LAMP-01", 10, 3).await;
    let id = product["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/sales",
        Some(json!({
            "items": [{ "productId": id, "quantity": 11 }],
            "paymentMethod": "Card",
            "salesperson": "Ama",
        })),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INSUFFICIENT_STOCK");

    let (_, fetched) = send(&app, Method::GET, &format!("/api/products/{}", id), None, None).await;
    assert_eq!(fetched["stockQuantity"], 10);
}

#[tokio::test]
async fn test_malformed_sale_body_is_validation_error() {
    let app = app().await;
    let product = create_product(&app, "LAMP-01", 10, 0).await;
    let id = product["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/sales",
        Some(json!({
            "items": [{ "productId": id, "quantity": 1 }],
            "paymentMethod": "Cash",
        })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["message"].as_str().unwrap().contains("salesperson"), "{}", body);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/sales",
        Some(json!({
            "items": [{ "productId": id, "quantity": 1 }],
            "paymentMethod": "Bitcoin",
            "salesperson": "Ama",
        })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (_, fetched) = send(&app, Method::GET, &format!("/api/products/{}", id), None, None).await;
    assert_eq!(fetched["stockQuantity"], 10);
}

#[tokio::test]
async fn test_bad_path_and_query_are_validation_errors() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/api/dashboard/daily-sales/week", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = send(&app, Method::GET, "/api/reports/top-products?limit=ten", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_partial_payment_shows_in_debts() {
    let app = app().await;
    let product = create_product(&app, "LAMP-01", 10, 0).await;
    let id = product["id"].as_str().unwrap();

    let (status, sale) = send(
        &app,
        Method::POST,
        "/api/sales",
        Some(json!({
            "items": [{ "product": id, "quantity": 4 }],
            "paymentMethod": "Partial",
            "paidAmountCents": 4000,
            "salesperson": "Ama",
        })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", sale);
    assert_eq!(sale["isDebt"], true);
    assert_eq!(sale["remainingDebtCents"], 6000);

    let (_, debts) = send(&app, Method::GET, "/api/sales/debts", None, None).await;
    assert_eq!(debts.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_restock_records_movement() {
    let app = app().await;
    let product = create_product(&app, "LAMP-01", 0, 3).await;
    let product_id = product["id"].as_str().unwrap();

    let (_, items) = send(&app, Method::GET, "/api/inventory", None, None).await;
    let inventory = items
        .as_array()
        .unwrap()
        .iter()
        .find(|i| i["productId"] == product_id)
        .unwrap();
    let inventory_id = inventory["id"].as_str().unwrap();

    let (status, item) = send(
        &app,
        Method::POST,
        &format!("/api/inventory/{}/restock", inventory_id),
        Some(json!({ "quantity": 20, "supplier": "Acme" })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", item);
    assert_eq!(item["currentStock"], 20);
    assert_eq!(item["lowStockAlert"], false);

    let (_, movements) = send(
        &app,
        Method::GET,
        &format!("/api/inventory/{}/movements", inventory_id),
        None,
        None,
    )
    .await;
    let movements = movements.as_array().unwrap();
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0]["type"], "IN");
    assert_eq!(movements[0]["quantity"], 20);
}

#[tokio::test]
async fn test_report_limit_out_of_range() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/api/reports/top-products?limit=0", None, None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_dashboard_on_empty_store() {
    let app = app().await;
    let (status, stats) = send(&app, Method::GET, "/api/dashboard/stats", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["totalSalesCents"], 0);
    assert_eq!(stats["salesGrowth"], 0.0);

    let (status, days) = send(&app, Method::GET, "/api/dashboard/daily-sales/7", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(days.is_array());
}

#[tokio::test]
async fn test_register_login_profile() {
    let app = app().await;

    let (status, registered) = send(
        &app,
        Method::POST,
        "/api/auth/register-business",
        Some(json!({
            "name": "Ama Mensah",
            "email": "Ama@Example.com",
            "password": "secret123",
            "businessName": "Ama's Shop",
            "businessCode": "ama-shop",
        })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", registered);
    assert_eq!(registered["user"]["role"], "owner");
    assert_eq!(registered["business"]["businessCode"], "AMA-SHOP");
    assert!(registered["user"].get("passwordHash").is_none());

    let (status, joined) = send(
        &app,
        Method::POST,
        "/api/auth/join-business",
        Some(json!({
            "name": "Kofi",
            "email": "kofi@example.com",
            "password": "secret123",
            "businessCode": "ama-shop",
        })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", joined);
    assert_eq!(joined["user"]["role"], "staff");
    assert_eq!(joined["business"]["businessCode"], "AMA-SHOP");
    assert_eq!(joined["business"]["name"], "Ama's Shop");

    let (status, login) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        Some(json!({ "email": "ama@example.com", "password": "secret123" })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = login["token"].as_str().unwrap();

    let (status, profile) = send(&app, Method::GET, "/api/auth/profile", None, Some(token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["email"], "ama@example.com");
    assert_eq!(profile["businessCode"], "AMA-SHOP");
}

#[tokio::test]
async fn test_login_failures_share_one_message() {
    let app = app().await;
    send(
        &app,
        Method::POST,
        "/api/auth/register",
        Some(json!({ "name": "Ama", "email": "ama@example.com", "password": "secret123" })),
        None,
    )
    .await;

    let (wrong_status, wrong) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        Some(json!({ "email": "ama@example.com", "password": "nope-nope" })),
        None,
    )
    .await;
    let (unknown_status, unknown) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        Some(json!({ "email": "nobody@example.com", "password": "secret123" })),
        None,
    )
    .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong["message"], unknown["message"]);
}

#[tokio::test]
async fn test_profile_requires_token() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/api/auth/profile", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, _) = send(&app, Method::GET, "/api/auth/profile", None, Some("garbage")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_join_unknown_business_is_not_found() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/join-business",
        Some(json!({
            "name": "Kofi",
            "email": "kofi@example.com",
            "password": "secret123",
            "businessCode": "NOPE",
        })),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}
