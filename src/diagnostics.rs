use std::any::Any;

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{debug, error};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/test", get(config_check))
        .route("/health", get(health))
}

/// Unauthenticated liveness probe that also reports whether the MongoDB
/// connection string is configured.
pub async fn config_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "server is running",
        "mongodb_uri": state.config.mongodb_configured(),
    }))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn not_found(uri: Uri) -> (StatusCode, &'static str) {
    debug!(path = %uri.path(), "no route");
    (StatusCode::NOT_FOUND, "page not found")
}

pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    };
    error!(%detail, "request handler panicked");
    (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
}
