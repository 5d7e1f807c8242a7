//! Integration tests for the picochain HTTP API
//!
//! These exercise the full router against an in-process node: the JSON
//! shapes here are the contract peers consume.

use std::sync::Arc;
use std::time::Duration;

use axum_test::TestServer;
use serde_json::{json, Value};

use picochain::api::build_api_router;
use picochain::node::Node;

fn test_server() -> TestServer {
    let node = Arc::new(Node::new(Duration::from_secs(1)));
    TestServer::new(build_api_router(node)).expect("Failed to create test server")
}

#[tokio::test]
async fn chain_starts_at_genesis() {
    let server = test_server();

    let response = server.get("/chain").await;
    assert_eq!(response.status_code(), 200);

    let json: Value = response.json();
    assert_eq!(json["length"], 1);
    let genesis = &json["chain"][0];
    assert_eq!(genesis["index"], 1);
    assert_eq!(genesis["previous_hash"], "1");
    assert_eq!(genesis["proof"], 100);
    assert!(genesis["transactions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn submitting_then_mining_grows_the_chain() {
    let server = test_server();

    let response = server
        .post("/transactions/new")
        .json(&json!({"sender": "0", "recipient": "A", "amount": 1}))
        .await;
    assert_eq!(response.status_code(), 201);
    let json: Value = response.json();
    assert_eq!(json["message"], "Transaction will be added to block 2");

    // Runs a real proof-of-work search (~65k hashes).
    let response = server.get("/mine").await;
    assert_eq!(response.status_code(), 200);
    let json: Value = response.json();
    assert_eq!(json["message"], "New Block Forged");
    assert_eq!(json["index"], 2);

    // The submitted transaction plus the mining reward.
    let transactions = json["transactions"].as_array().unwrap();
    assert_eq!(transactions.len(), 2);
    assert_eq!(transactions[0]["recipient"], "A");
    assert_eq!(transactions[1]["sender"], "0");
    assert_eq!(transactions[1]["amount"], 1.0);

    let response = server.get("/chain").await;
    let json: Value = response.json();
    assert_eq!(json["length"], 2);
    // The sealed block must link back via a real digest now.
    assert_eq!(
        json["chain"][1]["previous_hash"].as_str().unwrap().len(),
        64
    );
}

#[tokio::test]
async fn transactions_with_missing_fields_are_rejected() {
    let server = test_server();

    let response = server
        .post("/transactions/new")
        .json(&json!({"sender": "0"}))
        .await;
    assert_eq!(response.status_code(), 400);
    let json: Value = response.json();
    assert!(json["error"].is_string());

    // Nothing reached the ledger.
    let response = server.get("/chain").await;
    let json: Value = response.json();
    assert_eq!(json["length"], 1);
}

#[tokio::test]
async fn peer_registration_deduplicates_addresses() {
    let server = test_server();

    let response = server
        .post("/nodes/register")
        .json(&json!({"nodes": ["http://x:5000", "http://x:5000/"]}))
        .await;
    assert_eq!(response.status_code(), 201);
    let json: Value = response.json();
    assert_eq!(json["total_nodes"], json!(["x:5000"]));
}

#[tokio::test]
async fn a_rejected_registration_leaves_the_peer_set_untouched() {
    let server = test_server();

    let response = server
        .post("/nodes/register")
        .json(&json!({"nodes": ["http://x:5000", "not a url"]}))
        .await;
    assert_eq!(response.status_code(), 400);

    // The valid half of the rejected batch must not have been kept.
    let response = server
        .post("/nodes/register")
        .json(&json!({"nodes": ["http://y:6000"]}))
        .await;
    assert_eq!(response.status_code(), 201);
    let json: Value = response.json();
    assert_eq!(json["total_nodes"], json!(["y:6000"]));
}

#[tokio::test]
async fn registering_an_empty_node_list_is_rejected() {
    let server = test_server();

    let response = server.post("/nodes/register").json(&json!({})).await;
    assert_eq!(response.status_code(), 400);

    let response = server
        .post("/nodes/register")
        .json(&json!({"nodes": []}))
        .await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn resolving_without_peers_keeps_the_chain() {
    let server = test_server();

    let response = server.get("/nodes/resolve").await;
    assert_eq!(response.status_code(), 200);
    let json: Value = response.json();
    assert_eq!(json["replaced"], false);
    assert_eq!(json["message"], "Our chain is authoritative");
    assert_eq!(json["chain"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn health_endpoint_responds() {
    let server = test_server();

    let response = server.get("/health").await;
    assert_eq!(response.status_code(), 200);
    let json: Value = response.json();
    assert_eq!(json["status"], "healthy");
    assert!(json["timestamp"].is_string());
}
