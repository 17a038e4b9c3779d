use std::sync::Arc;

use tracing::info;

use crate::{
    config::{AppConfig, ConfigError, StoreBackend},
    db::{MemoryPairingStore, MongoConnector, MongoPairingStore, PairingStore},
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PairingStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn PairingStore>) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    /// Picks the store from config. Nothing connects here; MongoDB is reached
    /// on the first request that needs it.
    pub fn from_config(config: AppConfig) -> Result<Self, ConfigError> {
        let store: Arc<dyn PairingStore> = match (&config.store_backend, &config.mongodb_uri) {
            (StoreBackend::MongoDb, Some(uri)) => {
                let connector = MongoConnector::for_env(config.app_env, uri);
                info!(app_env = config.app_env.as_str(), "using MongoDB store");
                Arc::new(MongoPairingStore::new(connector))
            }
            (StoreBackend::MongoDb, None) => return Err(ConfigError::MissingVar("MONGODB_URI")),
            (StoreBackend::Memory, _) => {
                info!("using in-memory store");
                Arc::new(MemoryPairingStore::new())
            }
        };
        Ok(Self::new(config, store))
    }
}
