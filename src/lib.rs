//! WhatsApp pairing-request service.
//!
//! Accepts a phone number, records a pending pairing request in MongoDB and
//! lets the browser poll until an outside worker reports the pairing code
//! through the internal API.

use axum::Router;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod api;
pub mod config;
pub mod db;
pub mod diagnostics;
pub mod internal_api;
pub mod model;
pub mod pages;
pub mod state;

pub use config::AppConfig;
pub use state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(pages::pages_router())
        .merge(api::api_router())
        .merge(internal_api::router(state.clone()))
        .merge(diagnostics::router())
        .fallback(diagnostics::not_found)
        .method_not_allowed_fallback(diagnostics::not_found)
        .layer(CatchPanicLayer::custom(diagnostics::handle_panic))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
