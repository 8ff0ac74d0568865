use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;
use models::request::OperationRequest;
use service::dispatch::Dispatcher;

use crate::errors::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn index() -> Json<serde_json::Value> {
    Json(serde_json::json!({"message": "postbox message collection API"}))
}

/// Single dispatch endpoint: the parsed request carries the action, the
/// dispatcher produces the structured reply or a taxonomy error.
async fn dispatch_op(
    State(state): State<AppState>,
    Json(req): Json<OperationRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let reply = state.dispatcher.dispatch(req).await?;
    Ok(Json(reply.into_body()))
}

/// Build the full application router.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/messages", post(dispatch_op))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
