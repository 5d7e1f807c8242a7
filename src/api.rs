//! REST API server for picochain
//!
//! Exposes the ledger engine over HTTP: submit transactions, mine, read the
//! full chain, register peers, trigger consensus. Field names and response
//! shapes are part of the contract peers rely on.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::{self, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::block::Block;
use crate::consensus::ChainSnapshot;
use crate::error::ChainError;
use crate::node::Node;
use crate::transaction::Transaction;

// ============================================================================
// API Error Handling
// ============================================================================

#[derive(Debug)]
pub enum ApiError {
    InvalidInput(String),
    Conflict(String),
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<ChainError> for ApiError {
    fn from(err: ChainError) -> Self {
        match err {
            ChainError::Validation(msg) => ApiError::InvalidInput(msg),
            ChainError::MiningInterrupted => ApiError::Conflict(err.to_string()),
            other => ApiError::InternalError(other.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Fields arrive optional so their presence can be rejected with a 400
/// before anything reaches the ledger.
#[derive(Deserialize)]
struct NewTransactionRequest {
    sender: Option<String>,
    recipient: Option<String>,
    amount: Option<f64>,
}

#[derive(Serialize)]
struct MessageResponse {
    message: String,
}

#[derive(Serialize)]
struct MineResponse {
    message: String,
    index: u64,
    transactions: Vec<Transaction>,
    proof: u64,
    previous_hash: String,
}

#[derive(Deserialize)]
struct RegisterNodesRequest {
    nodes: Option<Vec<String>>,
}

#[derive(Serialize)]
struct RegisterNodesResponse {
    message: String,
    total_nodes: Vec<String>,
}

#[derive(Serialize)]
struct ResolveResponse {
    message: String,
    replaced: bool,
    chain: Vec<Block>,
}

// ============================================================================
// Middleware
// ============================================================================

/// Request logging middleware. Logs method, path, status and duration.
async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    tracing::info!(
        method = %method,
        path = %path,
        status = %response.status().as_u16(),
        duration_ms = %start.elapsed().as_millis(),
        "api.request"
    );

    response
}

// ============================================================================
// API Server
// ============================================================================

/// Build the API router with all endpoints (also used by tests).
pub fn build_api_router(node: Arc<Node>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(vec![
            http::Method::GET,
            http::Method::POST,
            http::Method::OPTIONS,
        ])
        .allow_headers(vec![http::header::CONTENT_TYPE])
        .allow_credentials(true);

    Router::new()
        .route("/transactions/new", post(new_transaction))
        .route("/mine", get(mine))
        .route("/chain", get(full_chain))
        .route("/nodes/register", post(register_nodes))
        .route("/nodes/resolve", get(resolve_conflicts))
        .route("/health", get(health_check))
        .layer(middleware::from_fn(logging_middleware))
        .with_state(node)
        .layer(cors)
}

/// Run the API server on the given port.
pub async fn run_api_server(node: Arc<Node>, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_api_router(node);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("API server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

// ============================================================================
// Route Handlers
// ============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn new_transaction(
    State(node): State<Arc<Node>>,
    Json(req): Json<NewTransactionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (Some(sender), Some(recipient), Some(amount)) = (req.sender, req.recipient, req.amount)
    else {
        return Err(ApiError::InvalidInput(
            "sender, recipient and amount are all required".to_string(),
        ));
    };

    let index = node
        .submit_transaction(Transaction::new(sender, recipient, amount))
        .await;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: format!("Transaction will be added to block {}", index),
        }),
    ))
}

async fn mine(State(node): State<Arc<Node>>) -> Result<Json<MineResponse>, ApiError> {
    let block = node.mine().await?;

    Ok(Json(MineResponse {
        message: "New Block Forged".to_string(),
        index: block.index,
        transactions: block.transactions,
        proof: block.proof,
        previous_hash: block.previous_hash,
    }))
}

async fn full_chain(State(node): State<Arc<Node>>) -> Json<ChainSnapshot> {
    Json(node.chain_snapshot().await)
}

async fn register_nodes(
    State(node): State<Arc<Node>>,
    Json(req): Json<RegisterNodesRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let addresses = req.nodes.unwrap_or_default();
    if addresses.is_empty() {
        return Err(ApiError::InvalidInput(
            "a non-empty list of nodes is required".to_string(),
        ));
    }

    // All-or-nothing: a malformed address rejects the whole batch without
    // touching the peer set.
    let mut ledger = node.ledger.write().await;
    ledger.register_peers(&addresses)?;

    // The set itself is unordered; sort for a stable response body.
    let mut total_nodes: Vec<String> = ledger.peers().iter().cloned().collect();
    total_nodes.sort();

    Ok((
        StatusCode::CREATED,
        Json(RegisterNodesResponse {
            message: "New nodes have been added".to_string(),
            total_nodes,
        }),
    ))
}

async fn resolve_conflicts(
    State(node): State<Arc<Node>>,
) -> Result<Json<ResolveResponse>, ApiError> {
    let (replaced, chain) = node.resolve().await?;

    let message = if replaced {
        "Our chain was replaced"
    } else {
        "Our chain is authoritative"
    };

    Ok(Json(ResolveResponse {
        message: message.to_string(),
        replaced,
        chain,
    }))
}
