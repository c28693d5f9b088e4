//! Persistent store for companions and session history
//!
//! Two backends implement [`CompanionStore`]:
//! - `memory`: process-local, for tests and throwaway servers
//! - `sqlite`: on-disk SQLite through an `r2d2` connection pool

mod error;
mod memory;
mod query;
mod sqlite;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use query::CompanionQuery;
pub use sqlite::SqliteStore;

use crate::companion::{Companion, SessionHistoryEntry};
use crate::config::StoreConfig;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

/// Table-level operations the directory needs from a store
#[async_trait::async_trait]
pub trait CompanionStore: Send + Sync {
    /// Insert a companion and return the stored row
    async fn insert_companion(&self, companion: Companion) -> StoreResult<Companion>;

    /// Filtered, range-sliced select in insertion order
    async fn select_companions(&self, query: &CompanionQuery) -> StoreResult<Vec<Companion>>;

    async fn companion_by_id(&self, id: &str) -> StoreResult<Option<Companion>>;

    /// Append a session history entry; fails with `UnknownCompanion` if the
    /// referenced companion does not exist
    async fn insert_session(&self, entry: SessionHistoryEntry) -> StoreResult<SessionHistoryEntry>;

    /// Companions joined through the `limit` most recent session entries,
    /// newest first, optionally restricted to one user
    async fn session_companions(&self, user_id: Option<&str>, limit: usize)
        -> StoreResult<Vec<Companion>>;

    /// All companions by `author`, newest first
    async fn companions_by_author(&self, author: &str) -> StoreResult<Vec<Companion>>;

    async fn count_by_author(&self, author: &str) -> StoreResult<usize>;

    /// Backend name for logging
    fn name(&self) -> &str;
}

/// Store backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Sqlite,
}

/// Store factory
pub struct StoreFactory;

impl StoreFactory {
    /// Open the backend named in the configuration
    pub fn open(config: &StoreConfig) -> Result<Arc<dyn CompanionStore>> {
        info!("Opening {:?} store", config.backend);

        match config.backend {
            StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
            StoreBackend::Sqlite => {
                let store = SqliteStore::open(&config.path)
                    .with_context(|| format!("Failed to open SQLite store at {}", config.path))?;
                Ok(Arc::new(store))
            }
        }
    }
}
