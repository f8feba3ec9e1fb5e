//! Route handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use blockwatch_core::error::SyncError;
use blockwatch_sync::{BlockParser, Parser};

use crate::types::{BlockNumberResponse, StatusResponse, SubscribeRequest, TransactionsResponse};

/// Create the API router over `parser`.
pub fn create_api_router(parser: Arc<BlockParser>) -> Router {
    Router::new()
        .route("/block", get(current_block))
        .route("/subscribe", post(subscribe))
        .route("/address/:id", get(transactions))
        .route("/status", get(status))
        .layer(TraceLayer::new_for_http())
        .with_state(parser)
}

async fn current_block(State(parser): State<Arc<BlockParser>>) -> Json<BlockNumberResponse> {
    Json(BlockNumberResponse {
        block_number: parser.current_block(),
    })
}

async fn subscribe(
    State(parser): State<Arc<BlockParser>>,
    body: Result<Json<SubscribeRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "rejecting malformed subscribe request");
            return (
                StatusCode::BAD_REQUEST,
                Json(format!("Malformed request: {}", rejection.body_text())),
            )
                .into_response();
        }
    };

    match parser.try_subscribe(&req.address) {
        Ok(_) => (
            StatusCode::OK,
            Json(format!("Address {} has been subscribed.", req.address)),
        )
            .into_response(),
        Err(SyncError::AlreadySubscribed(_)) => (
            StatusCode::OK,
            Json(format!("Address {} is already subscribed.", req.address)),
        )
            .into_response(),
        Err(e) => {
            debug!(address = %req.address, error = %e, "subscribe refused");
            (
                StatusCode::BAD_REQUEST,
                Json(format!("Invalid address: {}", req.address)),
            )
                .into_response()
        }
    }
}

async fn transactions(
    State(parser): State<Arc<BlockParser>>,
    Path(id): Path<String>,
) -> Json<TransactionsResponse> {
    Json(TransactionsResponse {
        transactions: parser.transactions(&id),
    })
}

async fn status(State(parser): State<Arc<BlockParser>>) -> Json<StatusResponse> {
    let engine = parser.state();
    Json(StatusResponse {
        state: engine.to_string(),
        engine,
        block_number: parser.current_block(),
        watched: parser.watched_count(),
        metrics: parser.metrics(),
    })
}
