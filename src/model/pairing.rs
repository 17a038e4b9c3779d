use bson::{doc, oid::ObjectId, Document};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::phone::PhoneNumber;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PairingStatus {
    Pending,
    Completed,
    Failed,
}

impl PairingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PairingStatus::Pending => "pending",
            PairingStatus::Completed => "completed",
            PairingStatus::Failed => "failed",
        }
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        matches!(self, PairingStatus::Pending)
    }
}

/// Document stored in `pairing_requests`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairingRequest {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub phone_number: PhoneNumber,
    pub status: PairingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pairing_code: Option<String>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl PairingRequest {
    pub fn new_pending(phone_number: PhoneNumber, now: DateTime<Utc>) -> Self {
        Self {
            id: ObjectId::new(),
            phone_number,
            status: PairingStatus::Pending,
            pairing_code: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id_hex(&self) -> String {
        self.id.to_hex()
    }
}

/// Fields an outside worker may change on a request. Anything else is rejected
/// at deserialization time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PairingUpdate {
    #[serde(default)]
    pub status: Option<PairingStatus>,
    #[serde(default)]
    pub pairing_code: Option<String>,
}

impl PairingUpdate {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.pairing_code.is_none()
    }

    /// `$set` body for the update, always refreshing `updatedAt`.
    pub fn to_set_document(&self, now: DateTime<Utc>) -> Document {
        let mut set = doc! { "updatedAt": bson::DateTime::from_chrono(now) };
        if let Some(status) = self.status {
            set.insert("status", status.as_str());
        }
        if let Some(code) = &self.pairing_code {
            set.insert("pairingCode", code.as_str());
        }
        set
    }

    pub fn apply(&self, record: &mut PairingRequest, now: DateTime<Utc>) {
        if let Some(status) = self.status {
            record.status = status;
        }
        if let Some(code) = &self.pairing_code {
            record.pairing_code = Some(code.clone());
        }
        record.updated_at = now;
    }
}

/// Current time truncated to millisecond precision, which is what BSON keeps.
pub fn now() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}
