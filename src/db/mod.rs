use async_trait::async_trait;
use bson::oid::ObjectId;
use thiserror::Error;

use crate::model::{PairingRequest, PairingUpdate, PhoneNumber};

pub mod memory;
pub mod mongo;

pub use memory::MemoryPairingStore;
pub use mongo::{MongoConnector, MongoPairingStore};

pub const DATABASE_NAME: &str = "pairing_bot";
pub const PAIRING_COLLECTION: &str = "pairing_requests";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),
    #[error("a pending pairing request already exists for this phone number")]
    DuplicatePending,
    #[error("database error: {0}")]
    Driver(#[from] mongodb::error::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

/// Data access for the `pairing_requests` collection.
///
/// Identifiers are passed as the client sent them; implementations reject
/// malformed ones with [`StoreError::InvalidIdentifier`] before touching the
/// store.
#[async_trait]
pub trait PairingStore: Send + Sync {
    async fn create_pairing_request(&self, phone: &PhoneNumber) -> Result<ObjectId, StoreError>;

    async fn get_pairing_request(&self, id: &str) -> Result<Option<PairingRequest>, StoreError>;

    async fn update_pairing_request(
        &self,
        id: &str,
        update: &PairingUpdate,
    ) -> Result<UpdateOutcome, StoreError>;

    async fn find_pending_by_phone(
        &self,
        phone: &PhoneNumber,
    ) -> Result<Option<PairingRequest>, StoreError>;

    /// Returns the pending request for `phone`, creating it when there is none.
    /// The flag is `true` when this call inserted the record.
    async fn find_or_create_pending(
        &self,
        phone: &PhoneNumber,
    ) -> Result<(PairingRequest, bool), StoreError>;
}

pub fn parse_object_id(id: &str) -> Result<ObjectId, StoreError> {
    ObjectId::parse_str(id).map_err(|_| StoreError::InvalidIdentifier(id.to_string()))
}
