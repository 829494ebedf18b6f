use std::sync::Arc;

use dreamweek_scheduler::{EventBus, Scheduler, SchedulerConfig, TracingNotifier};
use dreamweek_storage::{GoalStore, MemoryStore, S3Store};

use crate::config::{Config, StoreKind};

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub scheduler: Scheduler,
}

impl AppState {
    pub fn new(store: Arc<dyn GoalStore>) -> Self {
        let config = SchedulerConfig::default();
        let bus = EventBus::new(config.event_capacity);
        Self {
            scheduler: Scheduler::new(store, Arc::new(TracingNotifier), bus, config),
        }
    }

    pub async fn from_config(config: &Config) -> Self {
        let store: Arc<dyn GoalStore> = match config.store {
            StoreKind::S3 => {
                let client = match &config.region {
                    Some(region) => dreamweek_storage::client::build_client_for_region(region).await,
                    None => dreamweek_storage::client::build_client().await,
                };
                Arc::new(S3Store::new(client, config.bucket.clone()))
            }
            StoreKind::Memory => Arc::new(MemoryStore::new()),
        };
        Self::new(store)
    }
}
