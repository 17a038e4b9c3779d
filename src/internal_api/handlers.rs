use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use tracing::{debug, info};

use crate::{
    api::error::ApiError, internal_api::types::UpdatePairingResponse, model::PairingUpdate,
    state::AppState,
};

/// Entry point for the worker that performs the actual WhatsApp pairing: it
/// reports the outcome (`status`, optionally `pairingCode`) for a request.
pub async fn update_pairing(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<PairingUpdate>, JsonRejection>,
) -> Result<Json<UpdatePairingResponse>, ApiError> {
    let Json(update) = body.map_err(|rejection| {
        debug!(error = %rejection, "malformed pairing update");
        ApiError::bad_request(rejection.body_text())
    })?;

    if update.is_empty() {
        return Err(ApiError::bad_request("no fields to update"));
    }

    let outcome = state.store.update_pairing_request(&id, &update).await?;
    if outcome.matched == 0 {
        return Err(ApiError::not_found());
    }

    info!(
        request_id = %id,
        status = update.status.map(|s| s.as_str()),
        has_code = update.pairing_code.is_some(),
        "pairing request updated"
    );

    Ok(Json(UpdatePairingResponse {
        success: true,
        matched: outcome.matched,
        modified: outcome.modified,
    }))
}
