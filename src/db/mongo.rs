use std::sync::Arc;

use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use mongodb::{
    error::{Error as MongoError, ErrorKind, WriteFailure},
    options::IndexOptions,
    Client, Collection, Database, IndexModel,
};
use once_cell::sync::OnceCell as SyncOnceCell;
use tokio::sync::OnceCell;
use tracing::{debug, error, info, warn};

use super::{
    parse_object_id, PairingStore, StoreError, UpdateOutcome, DATABASE_NAME, PAIRING_COLLECTION,
};
use crate::{
    config::AppEnv,
    model::{pairing::now, PairingRequest, PairingStatus, PairingUpdate, PhoneNumber},
};

const PENDING_PHONE_INDEX: &str = "pending_phone_unique";
const DUPLICATE_KEY: i32 = 11000;

static SHARED_CONNECTOR: SyncOnceCell<Arc<MongoConnector>> = SyncOnceCell::new();

/// Connect-once provider for the MongoDB client.
///
/// The first caller of [`MongoConnector::client`] connects, pings and ensures
/// indexes; callers arriving while that is in flight wait for the same
/// attempt. A failed attempt is not cached.
pub struct MongoConnector {
    uri: String,
    client: OnceCell<Client>,
}

impl MongoConnector {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            client: OnceCell::new(),
        }
    }

    /// Development keeps one connector in a process-wide slot so rebuilt
    /// routers reuse it; other modes hand each caller its own.
    pub fn for_env(app_env: AppEnv, uri: &str) -> Arc<Self> {
        match app_env {
            AppEnv::Development => SHARED_CONNECTOR
                .get_or_init(|| Arc::new(Self::new(uri)))
                .clone(),
            AppEnv::Production => Arc::new(Self::new(uri)),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.client.initialized()
    }

    pub async fn client(&self) -> Result<&Client, StoreError> {
        self.client.get_or_try_init(|| self.connect()).await
    }

    async fn connect(&self) -> Result<Client, StoreError> {
        info!("connecting to MongoDB");
        let client = Client::with_uri_str(&self.uri).await.map_err(|err| {
            error!(error = %err, "MongoDB connection failed");
            err
        })?;

        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|err| {
                error!(error = %err, "MongoDB ping failed");
                err
            })?;

        ensure_indexes(&client).await?;
        info!(database = DATABASE_NAME, "MongoDB connected");
        Ok(client)
    }
}

async fn ensure_indexes(client: &Client) -> Result<(), StoreError> {
    let options = IndexOptions::builder()
        .name(PENDING_PHONE_INDEX.to_string())
        .unique(true)
        .partial_filter_expression(doc! { "status": PairingStatus::Pending.as_str() })
        .build();
    let index = IndexModel::builder()
        .keys(doc! { "phoneNumber": 1 })
        .options(options)
        .build();

    client
        .database(DATABASE_NAME)
        .collection::<PairingRequest>(PAIRING_COLLECTION)
        .create_index(index)
        .await?;
    debug!(index = PENDING_PHONE_INDEX, "index ensured");
    Ok(())
}

fn is_duplicate_key(err: &MongoError) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY
    )
}

fn map_write_error(err: MongoError) -> StoreError {
    if is_duplicate_key(&err) {
        StoreError::DuplicatePending
    } else {
        StoreError::Driver(err)
    }
}

/// Outcome of a `find_or_create_pending` whose insert hit the unique index.
fn settle_lost_race(
    phone: &PhoneNumber,
    winner: Option<PairingRequest>,
) -> Result<(PairingRequest, bool), StoreError> {
    match winner {
        Some(winner) => Ok((winner, false)),
        None => {
            warn!(phone = %phone, "pending winner left pending before re-read");
            Err(StoreError::DuplicatePending)
        }
    }
}

#[derive(Clone)]
pub struct MongoPairingStore {
    connector: Arc<MongoConnector>,
}

impl MongoPairingStore {
    pub fn new(connector: Arc<MongoConnector>) -> Self {
        Self { connector }
    }

    pub async fn database(&self) -> Result<Database, StoreError> {
        Ok(self.connector.client().await?.database(DATABASE_NAME))
    }

    pub async fn pairing_collection(&self) -> Result<Collection<PairingRequest>, StoreError> {
        Ok(self.database().await?.collection(PAIRING_COLLECTION))
    }

    async fn insert_pending(&self, phone: &PhoneNumber) -> Result<PairingRequest, StoreError> {
        let record = PairingRequest::new_pending(phone.clone(), now());
        self.pairing_collection()
            .await?
            .insert_one(&record)
            .await
            .map_err(map_write_error)?;
        Ok(record)
    }
}

#[async_trait]
impl PairingStore for MongoPairingStore {
    async fn create_pairing_request(&self, phone: &PhoneNumber) -> Result<ObjectId, StoreError> {
        let record = self.insert_pending(phone).await?;
        Ok(record.id)
    }

    async fn get_pairing_request(&self, id: &str) -> Result<Option<PairingRequest>, StoreError> {
        let oid = parse_object_id(id)?;
        let found = self
            .pairing_collection()
            .await?
            .find_one(doc! { "_id": oid })
            .await?;
        Ok(found)
    }

    async fn update_pairing_request(
        &self,
        id: &str,
        update: &PairingUpdate,
    ) -> Result<UpdateOutcome, StoreError> {
        let oid = parse_object_id(id)?;
        let set = update.to_set_document(now());
        let result = self
            .pairing_collection()
            .await?
            .update_one(doc! { "_id": oid }, doc! { "$set": set })
            .await
            .map_err(map_write_error)?;

        Ok(UpdateOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn find_pending_by_phone(
        &self,
        phone: &PhoneNumber,
    ) -> Result<Option<PairingRequest>, StoreError> {
        let found = self
            .pairing_collection()
            .await?
            .find_one(doc! {
                "phoneNumber": phone.as_str(),
                "status": PairingStatus::Pending.as_str(),
            })
            .await?;
        Ok(found)
    }

    async fn find_or_create_pending(
        &self,
        phone: &PhoneNumber,
    ) -> Result<(PairingRequest, bool), StoreError> {
        if let Some(existing) = self.find_pending_by_phone(phone).await? {
            return Ok((existing, false));
        }

        match self.insert_pending(phone).await {
            Ok(record) => Ok((record, true)),
            Err(StoreError::DuplicatePending) => {
                // Another submission inserted between our lookup and insert.
                debug!(phone = %phone, "lost pending insert race, reading winner");
                let winner = self.find_pending_by_phone(phone).await?;
                settle_lost_race(phone, winner)
            }
            Err(err) => Err(err),
        }
    }
}
