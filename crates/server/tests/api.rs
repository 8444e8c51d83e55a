use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use migration::MigratorTrait;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::Engine;
use server::{ServerState, router};

async fn app() -> Router {
    let db = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    router(ServerState {
        engine: Arc::new(engine),
    })
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
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

async fn put(app: &Router, id: &str, body: Value) -> (StatusCode, Value) {
    send(
        app,
        Method::PUT,
        &format!("/transactionservice/transaction/{id}"),
        Some(body),
    )
    .await
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app().await;
    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn chain_scenario_over_http() {
    let app = app().await;

    let (status, body) = put(&app, "10", json!({"amount": 5000, "type": "cars"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));

    let (status, _) = put(
        &app,
        "11",
        json!({"amount": 10000, "type": "shopping", "parent_id": 10}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get(&app, "/transactionservice/transaction/11").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"amount": 10000.0, "type": "shopping", "parent_id": 10})
    );

    let (_, body) = get(&app, "/transactionservice/transaction/10").await;
    assert_eq!(body, json!({"amount": 5000.0, "type": "cars"}));

    let (status, body) = get(&app, "/transactionservice/types/cars").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([10]));

    let (status, body) = get(&app, "/transactionservice/sum/10").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"sum": 15000.0}));

    let (status, body) = get(&app, "/transactionservice/sum/11").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"sum": 10000.0}));
}

#[tokio::test]
async fn decimal_amounts_sum_exactly() {
    let app = app().await;

    put(&app, "1", json!({"amount": 0.1, "type": "fee"})).await;
    put(&app, "2", json!({"amount": 0.2, "type": "fee", "parent_id": 1})).await;

    let (_, body) = get(&app, "/transactionservice/sum/1").await;
    assert_eq!(body, json!({"sum": 0.3}));
}

#[tokio::test]
async fn extra_decimals_are_rounded_to_cents() {
    let app = app().await;

    let (status, _) = put(&app, "1", json!({"amount": 12.345, "type": "x"})).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = get(&app, "/transactionservice/transaction/1").await;
    assert_eq!(body, json!({"amount": 12.35, "type": "x"}));
}

#[tokio::test]
async fn large_subtree_sums_do_not_fail() {
    let app = app().await;

    let (status, _) = put(&app, "1", json!({"amount": 50000000000000000.0, "type": "big"})).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = put(
        &app,
        "2",
        json!({"amount": 50000000000000000.0, "type": "big", "parent_id": 1}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get(&app, "/transactionservice/sum/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"sum": 1e17}));
}

#[tokio::test]
async fn cycle_is_rejected_with_400() {
    let app = app().await;

    put(&app, "1", json!({"amount": 1, "type": "a"})).await;
    put(&app, "2", json!({"amount": 1, "type": "a", "parent_id": 1})).await;

    let (status, body) = put(&app, "1", json!({"amount": 1, "type": "a", "parent_id": 2})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"error": "invalid transaction data: operation would create a cycle"})
    );
}

#[tokio::test]
async fn validation_failures_are_400() {
    let app = app().await;

    let (status, body) = put(&app, "4", json!({"amount": 50, "type": "x", "parent_id": 4})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"error": "invalid transaction data: self-reference not allowed"})
    );

    let (status, _) = put(&app, "5", json!({"amount": 0, "type": "x"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = put(&app, "5", json!({"amount": 0.001, "type": "x"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"error": "invalid transaction data: amount must be positive"})
    );

    let (status, _) = get(&app, "/transactionservice/transaction/5").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_records_are_404() {
    let app = app().await;

    let (status, body) = get(&app, "/transactionservice/transaction/99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "transaction 99 not found"}));

    let (status, _) = get(&app, "/transactionservice/sum/99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = put(&app, "6", json!({"amount": 30, "type": "y", "parent_id": 999})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_input_is_400() {
    let app = app().await;

    let (status, body) = get(&app, "/transactionservice/transaction/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "invalid transaction ID"}));

    let (status, body) = get(&app, "/transactionservice/sum/1.5").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "invalid transaction ID"}));

    let (status, body) = put(&app, "abc", json!({"amount": 1, "type": "x"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "invalid transaction ID"}));

    let (status, body) = put(&app, "1", json!({"amount": "lots", "type": "x"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "invalid request body"}));

    let (status, body) = put(&app, "1", json!({"type": "x"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "invalid request body"}));
}

#[tokio::test]
async fn unknown_type_is_an_empty_list() {
    let app = app().await;
    let (status, body) = get(&app, "/transactionservice/types/boats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn cors_preflight_is_permissive() {
    let app = app().await;

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/transactionservice/transaction/1")
        .header(header::ORIGIN, "http://example.test")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}
