use crate::directory::{DirectoryService, QuotaPolicy};
use crate::store::{CompanionStore, MemoryStore};
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<DirectoryService>,
}

impl AppState {
    pub fn new(store: Arc<dyn CompanionStore>, quota: QuotaPolicy) -> Self {
        Self {
            directory: Arc::new(DirectoryService::new(store, quota)),
        }
    }

    /// State backed by a fresh in-memory store and the default quota policy
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), QuotaPolicy::default())
    }
}
