use std::collections::HashMap;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tokio::sync::Mutex;

use super::{parse_object_id, PairingStore, StoreError, UpdateOutcome};
use crate::model::{pairing::now, PairingRequest, PairingUpdate, PhoneNumber};

/// Process-local store with the same contract as the MongoDB one, including
/// the one-pending-request-per-number rule.
#[derive(Default)]
pub struct MemoryPairingStore {
    records: Mutex<HashMap<ObjectId, PairingRequest>>,
}

impl MemoryPairingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }

    pub async fn records_for_phone(&self, phone: &str) -> Vec<PairingRequest> {
        self.records
            .lock()
            .await
            .values()
            .filter(|r| r.phone_number.as_str() == phone)
            .cloned()
            .collect()
    }
}

fn pending_for<'a>(
    records: &'a HashMap<ObjectId, PairingRequest>,
    phone: &str,
) -> Option<&'a PairingRequest> {
    records
        .values()
        .find(|r| r.status.is_pending() && r.phone_number.as_str() == phone)
}

#[async_trait]
impl PairingStore for MemoryPairingStore {
    async fn create_pairing_request(&self, phone: &PhoneNumber) -> Result<ObjectId, StoreError> {
        let mut records = self.records.lock().await;
        if pending_for(&records, phone.as_str()).is_some() {
            return Err(StoreError::DuplicatePending);
        }
        let record = PairingRequest::new_pending(phone.clone(), now());
        let id = record.id;
        records.insert(id, record);
        Ok(id)
    }

    async fn get_pairing_request(&self, id: &str) -> Result<Option<PairingRequest>, StoreError> {
        let oid = parse_object_id(id)?;
        Ok(self.records.lock().await.get(&oid).cloned())
    }

    async fn update_pairing_request(
        &self,
        id: &str,
        update: &PairingUpdate,
    ) -> Result<UpdateOutcome, StoreError> {
        let oid = parse_object_id(id)?;
        let mut records = self.records.lock().await;

        let Some(current) = records.get(&oid) else {
            return Ok(UpdateOutcome {
                matched: 0,
                modified: 0,
            });
        };

        if update.status.is_some_and(|s| s.is_pending()) && !current.status.is_pending() {
            let phone = current.phone_number.as_str().to_string();
            if pending_for(&records, &phone).is_some() {
                return Err(StoreError::DuplicatePending);
            }
        }

        let Some(record) = records.get_mut(&oid) else {
            return Ok(UpdateOutcome {
                matched: 0,
                modified: 0,
            });
        };
        // updatedAt always moves, so a matched document is always modified.
        update.apply(record, now());
        Ok(UpdateOutcome {
            matched: 1,
            modified: 1,
        })
    }

    async fn find_pending_by_phone(
        &self,
        phone: &PhoneNumber,
    ) -> Result<Option<PairingRequest>, StoreError> {
        let records = self.records.lock().await;
        Ok(pending_for(&records, phone.as_str()).cloned())
    }

    async fn find_or_create_pending(
        &self,
        phone: &PhoneNumber,
    ) -> Result<(PairingRequest, bool), StoreError> {
        let mut records = self.records.lock().await;
        if let Some(existing) = pending_for(&records, phone.as_str()) {
            return Ok((existing.clone(), false));
        }
        let record = PairingRequest::new_pending(phone.clone(), now());
        records.insert(record.id, record.clone());
        Ok((record, true))
    }
}
