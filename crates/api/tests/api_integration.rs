//! Integration tests for the API server.

use std::sync::{Arc, OnceLock};

use audit::InMemoryAuditSink;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{ProductId, UserId};
use domain::{Money, Product};
use metrics_exporter_prometheus::PrometheusHandle;
use ordering::OrderingService;
use store::{InMemoryStore, Store};
use tower::ServiceExt;

use api::routes::orders::AppState;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

type TestState = Arc<AppState<InMemoryStore, InMemoryAuditSink>>;

fn setup() -> (axum::Router, TestState) {
    let store = InMemoryStore::new();
    let state = Arc::new(AppState {
        service: OrderingService::new(store, InMemoryAuditSink::new()),
    });
    let app = api::create_app(state.clone(), get_metrics_handle());
    (app, state)
}

async fn seed_product(state: &TestState, name: &str, price_cents: i64, stock: i64) -> ProductId {
    let product = Product::new(name, Money::from_cents(price_cents), stock);
    let id = product.id;
    state.service.store().add_product(product).await;
    id
}

fn place_request(user: UserId, product_id: ProductId, quantity: u32, total_cents: i64) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/orders")
        .header("content-type", "application/json")
        .header("x-user-id", user.to_string())
        .body(Body::from(
            serde_json::to_string(&serde_json::json!({
                "items": [{ "product_id": product_id, "quantity": quantity }],
                "total_cents": total_cents,
            }))
            .unwrap(),
        ))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = setup();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_place_order_decrements_stock() {
    let (app, state) = setup();
    let product_id = seed_product(&state, "Widget", 5000, 5).await;
    let user = UserId::new();

    let response = app
        .oneshot(place_request(user, product_id, 3, 15000))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["status"], "pending");
    assert_eq!(json["user_id"], user.to_string());
    assert_eq!(json["items"][0]["name"], "Widget");
    assert_eq!(json["items"][0]["quantity"], 3);
    assert_eq!(json["total_cents"], 15000);

    let product = state
        .service
        .store()
        .get_product(product_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(product.stock, 2);
}

#[tokio::test]
async fn test_insufficient_stock_is_422_and_stock_unchanged() {
    let (app, state) = setup();
    let product_id = seed_product(&state, "Widget", 5000, 2).await;

    let response = app
        .oneshot(place_request(UserId::new(), product_id, 3, 15000))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Insufficient stock for Widget. Available: 2");

    let product = state
        .service
        .store()
        .get_product(product_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(product.stock, 2);
}

#[tokio::test]
async fn test_empty_items_is_400() {
    let (app, _) = setup();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/orders")
                .header("content-type", "application/json")
                .header("x-user-id", UserId::new().to_string())
                .body(Body::from(r#"{"items": [], "total_cents": 0}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_actor_header_is_400() {
    let (app, state) = setup();
    let product_id = seed_product(&state, "Widget", 5000, 5).await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/orders")
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::to_string(&serde_json::json!({
                        "items": [{ "product_id": product_id, "quantity": 1 }],
                        "total_cents": 5000,
                    }))
                    .unwrap(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "missing x-user-id header");
}

#[tokio::test]
async fn test_unknown_product_is_404() {
    let (app, _) = setup();

    let response = app
        .oneshot(place_request(UserId::new(), ProductId::new(), 1, 100))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_order_roundtrip() {
    let (app, state) = setup();
    let product_id = seed_product(&state, "Widget", 5000, 5).await;
    let user = UserId::new();

    let created = app
        .clone()
        .oneshot(place_request(user, product_id, 2, 10000))
        .await
        .unwrap();
    let created = body_json(created).await;
    let order_id = created["id"].as_str().unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/orders/{order_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["id"], order_id);
    assert_eq!(json["items"][0]["unit_price_cents"], 5000);
}

#[tokio::test]
async fn test_get_unknown_order_is_404() {
    let (app, _) = setup();

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/orders/{}", uuid::Uuid::new_v4()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_status() {
    let (app, state) = setup();
    let product_id = seed_product(&state, "Widget", 5000, 5).await;
    let user = UserId::new();

    let created = app
        .clone()
        .oneshot(place_request(user, product_id, 1, 5000))
        .await
        .unwrap();
    let order_id = body_json(created).await["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/orders/{order_id}/status"))
                .header("content-type", "application/json")
                .header("x-user-id", user.to_string())
                .body(Body::from(r#"{"status": "for delivery"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "for delivery");

    // Unknown status string is rejected.
    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/orders/{order_id}/status"))
                .header("content-type", "application/json")
                .header("x-user-id", user.to_string())
                .body(Body::from(r#"{"status": "shipped"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_restores_stock_and_replay_is_404() {
    let (app, state) = setup();
    let product_id = seed_product(&state, "Widget", 5000, 5).await;
    let user = UserId::new();

    let created = app
        .clone()
        .oneshot(place_request(user, product_id, 2, 10000))
        .await
        .unwrap();
    let order_id = body_json(created).await["id"].as_str().unwrap().to_string();

    let delete_req = || {
        Request::builder()
            .method("DELETE")
            .uri(format!("/orders/{order_id}"))
            .header("x-user-id", user.to_string())
            .body(Body::empty())
            .unwrap()
    };

    let response = app.clone().oneshot(delete_req()).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let product = state
        .service
        .store()
        .get_product(product_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(product.stock, 5);

    // Replay: the order is gone, and stock is not adjusted again.
    let response = app.oneshot(delete_req()).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let product = state
        .service
        .store()
        .get_product(product_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(product.stock, 5);
}

#[tokio::test]
async fn test_delete_delivered_order_keeps_stock() {
    let (app, state) = setup();
    let product_id = seed_product(&state, "Widget", 5000, 5).await;
    let user = UserId::new();

    let created = app
        .clone()
        .oneshot(place_request(user, product_id, 2, 10000))
        .await
        .unwrap();
    let order_id = body_json(created).await["id"].as_str().unwrap().to_string();

    app.clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/orders/{order_id}/status"))
                .header("content-type", "application/json")
                .header("x-user-id", user.to_string())
                .body(Body::from(r#"{"status": "delivered"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/orders/{order_id}"))
                .header("x-user-id", user.to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let product = state
        .service
        .store()
        .get_product(product_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(product.stock, 3);
}

#[tokio::test]
async fn test_audit_entries_follow_lifecycle() {
    use audit::AuditAction;

    let (app, state) = setup();
    let product_id = seed_product(&state, "Widget", 5000, 5).await;
    let user = UserId::new();

    let created = app
        .clone()
        .oneshot(place_request(user, product_id, 1, 5000))
        .await
        .unwrap();
    let order_id = body_json(created).await["id"].as_str().unwrap().to_string();

    app.oneshot(
        Request::builder()
            .method("DELETE")
            .uri(format!("/orders/{order_id}"))
            .header("x-user-id", user.to_string())
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();

    let entries = state.service.audit().entries();
    let actions: Vec<AuditAction> = entries.iter().map(|e| e.action).collect();
    assert_eq!(actions, vec![AuditAction::Create, AuditAction::Delete]);
    assert!(entries.iter().all(|e| e.actor == user));
}
