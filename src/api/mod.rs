use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub mod error;
pub mod handlers;
pub mod types;

use handlers::{check_status, request_pairing};

/// JSON routes used by the form page's script and by API clients.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/api/request-pairing", post(request_pairing))
        .route("/api/check-status/{id}", get(check_status))
}
