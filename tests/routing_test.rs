// Router tests that never reach the database.
// The pool connects lazily, so every request here must be answered by
// validation or path parsing before a query would run.

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

use wallet_ledger_api::{router, AppState, Config};

fn offline_server() -> TestServer {
    let config = Config::with_database_url("postgresql://nobody@127.0.0.1:1/unused");
    let pool = PgPoolOptions::new()
        .connect_lazy(&config.database_url)
        .expect("lazy pool");
    TestServer::new(router(AppState::new(Arc::new(pool), Arc::new(config)))).expect("test server")
}

#[tokio::test]
async fn test_health_check() {
    let server = offline_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    response.assert_text("OK");
}

#[tokio::test]
async fn test_malformed_ids_are_not_found() {
    let server = offline_server();
    server.get("/wallets/123").await.assert_status(StatusCode::NOT_FOUND);
    server.delete("/wallets/123").await.assert_status(StatusCode::NOT_FOUND);
    server
        .get("/wallets/123/transactions")
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .get("/transactions/not-a-txid")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_wallet_label_is_validated() {
    let server = offline_server();

    let response = server.post("/wallets").json(&json!({})).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body, json!({ "label": ["This field is required."] }));

    let response = server.post("/wallets").json(&json!({ "label": "  " })).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["label"][0], "This field may not be blank.");
}

#[tokio::test]
async fn test_transaction_body_is_validated() {
    let server = offline_server();

    let response = server.post("/transactions").json(&json!({ "amount": "1" })).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["wallet"][0], "This field is required.");

    let response = server
        .post("/transactions")
        .json(&json!({ "wallet": "nope", "amount": "1" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["wallet"][0], "Must be a valid UUID.");

    let response = server
        .post("/transactions")
        .json(&json!({ "wallet": uuid::Uuid::new_v4().to_string(), "amount": [1] }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["amount"][0], "A valid number is required.");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let server = offline_server();
    let response = server
        .post("/wallets")
        .content_type("application/json")
        .bytes("{not json".into())
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["non_field_errors"].is_array());
}

#[tokio::test]
async fn test_list_parameters_are_validated() {
    let server = offline_server();

    let response = server.get("/wallets").add_query_param("page", "0").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["page"][0], "Invalid page.");

    server
        .get("/wallets")
        .add_query_param("ordering", "-balance")
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    server
        .get("/transactions")
        .add_query_param("ordering", "label")
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    server
        .get("/transactions")
        .add_query_param("max_amount", "ten")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}
