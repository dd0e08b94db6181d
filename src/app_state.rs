use std::sync::Arc;

use crate::config::Config;
use crate::services::{
    BulletinBoard, CapacityLedger, EngagementService, EventDirectory, MembershipRegistry,
};
use crate::storage::{PostgresStore, SqliteStore, Store};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn Store>,
    pub directory: EventDirectory,
    pub ledger: CapacityLedger,
    pub registry: MembershipRegistry,
    pub engagement: EngagementService,
    pub bulletin: BulletinBoard,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        // Backend is picked off the URL scheme; Postgres in deployment,
        // SQLite for local runs.
        let store: Arc<dyn Store> = if config.database.url.starts_with("postgres") {
            Arc::new(PostgresStore::connect(&config.database.url).await?)
        } else {
            Arc::new(SqliteStore::connect(&config.database.url).await?)
        };
        store.init().await?;

        Ok(Self::with_store(config, store))
    }

    /// Wire the services around an already-initialized store. Tests use
    /// this with an in-memory SQLite store.
    pub fn with_store(config: Config, store: Arc<dyn Store>) -> Self {
        let directory = EventDirectory::new(store.clone(), config.cache.capacity);
        let ledger = CapacityLedger::new(store.clone());
        let registry = MembershipRegistry::new(store.clone());
        let engagement = EngagementService::new(store.clone(), ledger.clone());
        let bulletin = BulletinBoard::new(store.clone());

        AppState {
            config,
            store,
            directory,
            ledger,
            registry,
            engagement,
            bulletin,
        }
    }
}
