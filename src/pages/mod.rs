use axum::{
    extract::{rejection::FormRejection, Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use tracing::{debug, error, warn};

use crate::{
    api::{
        handlers::{submit_phone_number, SubmitError},
        types::waiting_url,
    },
    db::StoreError,
    state::AppState,
};

pub mod templates;

const SERVER_ERROR_TEXT: &str = "Something went wrong on our side, please try again.";

pub fn pages_router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/waiting/{id}", get(waiting))
        .route("/request-pairing", post(submit_form))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairingForm {
    #[serde(default)]
    pub phone_number: Option<String>,
}

fn index_page(status: StatusCode, error: Option<&str>, phone_number: Option<&str>) -> Response {
    match templates::render_index(error, phone_number) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(err) => {
            error!(error = %err, "failed to render index page");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
        }
    }
}

pub async fn index() -> Response {
    index_page(StatusCode::OK, None, None)
}

pub async fn waiting(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let record = match state.store.get_pairing_request(&id).await {
        Ok(Some(record)) => record,
        Ok(None) => return (StatusCode::NOT_FOUND, "pairing request not found").into_response(),
        Err(StoreError::InvalidIdentifier(_)) => {
            return (StatusCode::BAD_REQUEST, "invalid request id").into_response()
        }
        Err(err) => {
            error!(error = %err, request_id = %id, "failed to load pairing request");
            return (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response();
        }
    };

    match templates::render_waiting(&record.id_hex(), record.phone_number.as_str()) {
        Ok(html) => Html(html).into_response(),
        Err(err) => {
            error!(error = %err, "failed to render waiting page");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
        }
    }
}

/// Plain HTML form post. Success is a 302 to the waiting page; every failure
/// re-renders the form with the reason.
pub async fn submit_form(
    State(state): State<AppState>,
    form: Result<Form<PairingForm>, FormRejection>,
) -> Response {
    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => {
            debug!(error = %rejection, "malformed pairing form");
            return index_page(StatusCode::BAD_REQUEST, Some(&rejection.body_text()), None);
        }
    };

    let submitted = form.phone_number.as_deref();
    match submit_phone_number(state.store.as_ref(), submitted).await {
        Ok((record, _)) => (
            StatusCode::FOUND,
            [(header::LOCATION, waiting_url(&record.id_hex()))],
        )
            .into_response(),
        Err(SubmitError::Phone(err)) => {
            index_page(StatusCode::BAD_REQUEST, Some(&err.to_string()), submitted)
        }
        Err(SubmitError::Store(err @ StoreError::DuplicatePending)) => {
            warn!(error = %err, "pending request changed during form submission");
            index_page(StatusCode::CONFLICT, Some(&err.to_string()), submitted)
        }
        Err(SubmitError::Store(err)) => {
            error!(error = %err, "pairing form submission failed");
            index_page(
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(SERVER_ERROR_TEXT),
                submitted,
            )
        }
    }
}
