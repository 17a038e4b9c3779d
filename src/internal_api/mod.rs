use axum::{middleware, routing::post, Router};

use crate::state::AppState;

pub mod auth;
pub mod handlers;
pub mod types;

use auth::require_internal_auth;
use handlers::update_pairing;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/internal/pairing/{id}", post(update_pairing))
        .route_layer(middleware::from_fn_with_state(state, require_internal_auth))
}
