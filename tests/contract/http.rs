//! HTTP transport integration tests.
//!
//! Starts an axum server and exercises it with reqwest.

use std::sync::Arc;

use serde_json::{json, Value};
use starfleet_ledger::gateway::http;
use starfleet_ledger::{personnel_contract, GatewayConfig, InMemoryWorldState, LocalGateway, WorldState};

/// Bind to port 0 and return the base URL plus the shared world.
async fn start_server() -> (String, InMemoryWorldState) {
    let world = InMemoryWorldState::new();
    let gateway = Arc::new(LocalGateway::new(
        GatewayConfig::new("starfleet", "personnel"),
        personnel_contract(),
        world.clone(),
    ));
    let app = http::router(gateway);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), world)
}

#[tokio::test]
async fn health_lists_transactions() {
    let (base, _) = start_server().await;
    let resp = reqwest::get(format!("{base}/health")).await.unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["ok"], true);
    assert_eq!(body["channel"], "starfleet");
    assert_eq!(body["chaincode"], "personnel");
    assert_eq!(body["transactions"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn submit_then_evaluate() {
    let (base, world) = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/submit/EnrollCadet"))
        .json(&json!(["SF-001", "Malcom Reynolds", "Engineering"]))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(world.height().unwrap(), 1);

    let resp = client
        .post(format!("{base}/evaluate/PersonnelContract:GetPersonnel"))
        .json(&json!(["SF-001"]))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["name"], "Malcom Reynolds");
}

#[tokio::test]
async fn errors_carry_status_and_message() {
    let (base, world) = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/evaluate/GetPersonnel"))
        .json(&json!(["SF-404"]))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["kind"], "NotFound");
    assert!(body["error"].as_str().unwrap().contains("SF-404"));

    let resp = client
        .post(format!("{base}/submit/EnrollCadet"))
        .json(&json!(["SF-001"]))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    assert_eq!(world.height().unwrap(), 0);
}
