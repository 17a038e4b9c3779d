use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    api::{
        error::ApiError,
        types::{waiting_url, CheckStatusResponse, RequestPairingBody, RequestPairingResponse},
    },
    db::{PairingStore, StoreError},
    model::{PairingRequest, PhoneError, PhoneNumber},
    state::AppState,
};

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Phone(#[from] PhoneError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Validates the submitted number and returns the pending request for it,
/// creating one if needed. The flag tells whether a record was inserted.
pub async fn submit_phone_number(
    store: &dyn PairingStore,
    raw: Option<&str>,
) -> Result<(PairingRequest, bool), SubmitError> {
    let phone = PhoneNumber::parse(raw).map_err(|err| {
        debug!(error = %err, "rejected phone number");
        err
    })?;

    let (record, created) = store.find_or_create_pending(&phone).await?;
    if created {
        info!(request_id = %record.id, phone = %phone, "pairing request created");
    } else {
        info!(request_id = %record.id, phone = %phone, "reusing pending pairing request");
    }
    Ok((record, created))
}

pub async fn request_pairing(
    State(state): State<AppState>,
    body: Result<Json<RequestPairingBody>, JsonRejection>,
) -> Result<Json<RequestPairingResponse>, ApiError> {
    let Json(body) = body.map_err(|rejection| {
        debug!(error = %rejection, "malformed request-pairing body");
        ApiError::bad_request(rejection.body_text())
    })?;

    let (record, created) =
        submit_phone_number(state.store.as_ref(), body.phone_number.as_deref()).await?;

    let request_id = record.id_hex();
    Ok(Json(RequestPairingResponse {
        success: true,
        redirect_url: waiting_url(&request_id),
        request_id,
        message: (!created).then(|| "A request for this number is already pending".to_string()),
    }))
}

pub async fn check_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CheckStatusResponse>, ApiError> {
    let record = state
        .store
        .get_pairing_request(&id)
        .await?
        .ok_or_else(ApiError::not_found)?;

    Ok(Json(record.into()))
}
