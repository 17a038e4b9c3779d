use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tracing::{error, warn};

use crate::{config::InternalAuth, state::AppState};

/// HTTP Basic guard for the worker-facing routes. Credentials come from
/// `INTERNAL_API_USERNAME` / `INTERNAL_API_PASSWORD`; without them every
/// request is refused with 500.
pub async fn require_internal_auth(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let Some(config) = state.config.internal_auth.as_ref() else {
        error!("internal API credentials missing; internal routes disabled");
        return internal_error_response();
    };

    match basic_credentials(&req) {
        Some((username, password)) if credentials_match(config, &username, &password) => {
            next.run(req).await
        }
        Some((username, _)) => {
            warn!(%username, path = %req.uri().path(), "rejected internal API credentials");
            unauthorized_response()
        }
        None => unauthorized_response(),
    }
}

fn credentials_match(config: &InternalAuth, username: &str, password: &str) -> bool {
    username == config.username && password == config.password
}

fn basic_credentials(req: &Request<Body>) -> Option<(String, String)> {
    let header_str = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let encoded = header_str.strip_prefix("Basic ")?;
    let decoded = BASE64.decode(encoded.trim()).ok()?;
    let decoded_str = String::from_utf8(decoded).ok()?;

    let (username, password) = decoded_str.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

fn unauthorized_response() -> Response {
    let mut res = Response::new(Body::from("unauthorized"));
    *res.status_mut() = StatusCode::UNAUTHORIZED;
    res.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"Internal\""),
    );
    res
}

fn internal_error_response() -> Response {
    let mut res = Response::new(Body::from("internal auth not configured"));
    *res.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    res
}
