use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

use crate::{api::handlers::SubmitError, db::StoreError, model::PhoneError};

/// JSON error body shared by the `/api` routes: `{ "success": false, "error": ... }`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "pairing request not found")
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "success": false, "error": self.message }));
        (self.status, body).into_response()
    }
}

impl From<PhoneError> for ApiError {
    fn from(err: PhoneError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidIdentifier(_) => Self::bad_request("invalid request id"),
            StoreError::DuplicatePending => {
                warn!("conflicting pending pairing request");
                Self::new(StatusCode::CONFLICT, StoreError::DuplicatePending.to_string())
            }
            StoreError::Driver(err) => {
                error!(error = %err, "store operation failed");
                Self::internal()
            }
        }
    }
}

impl From<SubmitError> for ApiError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Phone(err) => err.into(),
            SubmitError::Store(err) => err.into(),
        }
    }
}
