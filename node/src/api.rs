//! # REST API
//!
//! Builds the axum router that exposes the star registry over HTTP. All
//! endpoints share application state through axum's `State` extractor.
//!
//! ## Endpoints
//!
//! | Method | Path                     | Description                          |
//! |--------|--------------------------|--------------------------------------|
//! | GET    | `/health`                | Liveness probe                       |
//! | GET    | `/status`                | Height, window, version              |
//! | GET    | `/block/height/:height`  | Block by height                      |
//! | GET    | `/block/hash/:hash`      | Block by hex digest                  |
//! | POST   | `/requestValidation`     | Issue an ownership challenge         |
//! | POST   | `/submitstar`            | Submit a signed challenge and a star |
//! | GET    | `/blocks/:address`       | Stars owned by an address            |
//! | GET    | `/validateChain`         | Chain audit report                   |

use axum::{
    extract::{Path, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use starchain_protocol::registry::{RegistryError, StarRegistry};
use starchain_protocol::storage::{Block, BlockPayload, Star};

use crate::metrics::SharedMetrics;

// ---------------------------------------------------------------------------
// Application State
// ---------------------------------------------------------------------------

/// Shared application state available to all request handlers.
///
/// Cheap to clone — everything behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// The node's reported version string.
    pub version: String,
    /// The registry every handler reads from and writes to.
    pub registry: Arc<StarRegistry>,
    /// Prometheus metrics for in-handler recording.
    pub metrics: SharedMetrics,
}

// ---------------------------------------------------------------------------
// Router Construction
// ---------------------------------------------------------------------------

/// Builds the full axum [`Router`] with all API routes, CORS, and tracing.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/status", get(status_handler))
        .route("/block/height/:height", get(block_by_height_handler))
        .route("/block/hash/:hash", get(block_by_hash_handler))
        .route("/requestValidation", post(request_validation_handler))
        .route("/submitstar", post(submit_star_handler))
        .route("/blocks/:address", get(stars_by_owner_handler))
        .route("/validateChain", get(validate_chain_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request / Response Types
// ---------------------------------------------------------------------------

/// Body of `POST /requestValidation`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ValidationRequest {
    pub address: String,
}

/// Body of `POST /submitstar`.
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitStarRequest {
    pub address: String,
    pub message: String,
    pub signature: String,
    pub star: Star,
}

/// A block as rendered by the API: digests in hex, payload decoded.
#[derive(Debug, Serialize, Deserialize)]
pub struct BlockResponse {
    pub height: u64,
    pub hash: String,
    pub previous_hash: Option<String>,
    pub timestamp: u64,
    /// Raw hex-encoded body, exactly as hashed.
    pub body: String,
    /// Decoded body. `None` when the body no longer decodes.
    pub payload: Option<BlockPayload>,
}

impl From<Block> for BlockResponse {
    fn from(block: Block) -> Self {
        let payload = block.decode_payload().ok();
        Self {
            height: block.height,
            hash: block.hash_hex(),
            previous_hash: block.previous_hash_hex(),
            timestamp: block.timestamp,
            body: block.body,
            payload,
        }
    }
}

/// Response payload for `GET /status`.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub version: String,
    /// Tip height, `-1` before genesis.
    pub chain_height: i64,
    pub challenge_window_secs: u64,
    /// ISO-8601 timestamp of the response.
    pub timestamp: String,
}

/// Generic error body returned by REST endpoints on failure.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, msg: impl Into<String>) -> Response {
    (status, Json(ErrorResponse { error: msg.into() })).into_response()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /health` — returns 200 if the node is alive.
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

/// `GET /status` — node status summary.
async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(StatusResponse {
        version: state.version.clone(),
        chain_height: state.registry.chain_height(),
        challenge_window_secs: state.registry.challenge_window_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// `GET /block/height/:height` — 404 if no block exists at that height.
async fn block_by_height_handler(
    Path(height): Path<u64>,
    State(state): State<AppState>,
) -> Response {
    match state.registry.get_block_by_height(height) {
        Some(block) => Json(BlockResponse::from(block)).into_response(),
        None => error_response(
            StatusCode::NOT_FOUND,
            format!("block not found at height {}", height),
        ),
    }
}

/// `GET /block/hash/:hash` — 404 for unknown or malformed digests.
async fn block_by_hash_handler(
    Path(hash): Path<String>,
    State(state): State<AppState>,
) -> Response {
    match state.registry.get_block_by_hash(&hash) {
        Some(block) => Json(BlockResponse::from(block)).into_response(),
        None => error_response(StatusCode::NOT_FOUND, format!("block not found: {}", hash)),
    }
}

/// `POST /requestValidation` — returns the challenge to sign as a JSON string.
async fn request_validation_handler(
    State(state): State<AppState>,
    Json(req): Json<ValidationRequest>,
) -> Response {
    let address = req.address.trim();
    if address.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "address is required");
    }
    Json(state.registry.request_challenge(address)).into_response()
}

/// `POST /submitstar` — verify the signed challenge and append the star.
///
/// 401 for a bad signature, 408 for an expired challenge, 400 for a
/// malformed one.
async fn submit_star_handler(
    State(state): State<AppState>,
    Json(req): Json<SubmitStarRequest>,
) -> Response {
    let result =
        state
            .registry
            .submit_star(&req.address, &req.message, &req.signature, req.star);

    match result {
        Ok(block) => {
            state.metrics.blocks_appended_total.inc();
            state.metrics.chain_height.set(block.height as i64);
            Json(BlockResponse::from(block)).into_response()
        }
        Err(e) => {
            let (status, reason) = match &e {
                RegistryError::InvalidSignature => (StatusCode::UNAUTHORIZED, "invalid_signature"),
                RegistryError::ExpiredChallenge { .. } => {
                    (StatusCode::REQUEST_TIMEOUT, "expired_challenge")
                }
                RegistryError::MalformedChallenge(_) => {
                    (StatusCode::BAD_REQUEST, "malformed_challenge")
                }
                RegistryError::Payload(_) => (StatusCode::INTERNAL_SERVER_ERROR, "payload"),
            };
            state
                .metrics
                .proofs_rejected_total
                .with_label_values(&[reason])
                .inc();
            error_response(status, e.to_string())
        }
    }
}

/// `GET /blocks/:address` — stars registered to `address`, possibly empty.
async fn stars_by_owner_handler(
    Path(address): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    Json(state.registry.stars_by_owner(&address))
}

/// `GET /validateChain` — list of issue descriptions; empty means consistent.
async fn validate_chain_handler(State(state): State<AppState>) -> impl IntoResponse {
    let issues: Vec<String> = state
        .registry
        .validate_chain()
        .iter()
        .map(ToString::to_string)
        .collect();
    state.metrics.validation_issues.set(issues.len() as i64);
    if !issues.is_empty() {
        tracing::warn!(count = issues.len(), "chain audit found issues");
    }
    Json(issues)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
