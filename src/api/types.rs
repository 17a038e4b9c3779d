use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{PairingRequest, PairingStatus};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestPairingBody {
    #[serde(default)]
    pub phone_number: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestPairingResponse {
    pub success: bool,
    pub request_id: String,
    pub redirect_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckStatusResponse {
    pub success: bool,
    pub status: PairingStatus,
    pub pairing_code: Option<String>,
    pub phone_number: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PairingRequest> for CheckStatusResponse {
    fn from(req: PairingRequest) -> Self {
        Self {
            success: true,
            status: req.status,
            pairing_code: req.pairing_code,
            phone_number: req.phone_number.as_str().to_string(),
            created_at: req.created_at,
            updated_at: req.updated_at,
        }
    }
}

pub fn waiting_url(request_id: &str) -> String {
    format!("/waiting/{request_id}")
}
