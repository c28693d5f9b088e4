use super::{CompanionQuery, CompanionStore, StoreError, StoreResult};
use crate::companion::{Companion, SessionHistoryEntry};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    /// Insertion order
    companions: Vec<Companion>,

    /// Append-only, insertion order
    session_history: Vec<SessionHistoryEntry>,
}

/// Process-local store
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl CompanionStore for MemoryStore {
    async fn insert_companion(&self, companion: Companion) -> StoreResult<Companion> {
        let mut tables = self.tables.write().await;
        tables.companions.push(companion.clone());
        Ok(companion)
    }

    async fn select_companions(&self, query: &CompanionQuery) -> StoreResult<Vec<Companion>> {
        let tables = self.tables.read().await;
        Ok(tables
            .companions
            .iter()
            .filter(|companion| query.matches(companion))
            .skip(query.offset)
            .take(query.limit)
            .cloned()
            .collect())
    }

    async fn companion_by_id(&self, id: &str) -> StoreResult<Option<Companion>> {
        let tables = self.tables.read().await;
        Ok(tables.companions.iter().find(|c| c.id == id).cloned())
    }

    async fn insert_session(&self, entry: SessionHistoryEntry) -> StoreResult<SessionHistoryEntry> {
        let mut tables = self.tables.write().await;
        if !tables.companions.iter().any(|c| c.id == entry.companion_id) {
            return Err(StoreError::UnknownCompanion(entry.companion_id));
        }
        tables.session_history.push(entry.clone());
        Ok(entry)
    }

    async fn session_companions(
        &self,
        user_id: Option<&str>,
        limit: usize,
    ) -> StoreResult<Vec<Companion>> {
        let tables = self.tables.read().await;
        Ok(tables
            .session_history
            .iter()
            .rev()
            .filter(|entry| user_id.map_or(true, |user| entry.user_id == user))
            .filter_map(|entry| {
                tables
                    .companions
                    .iter()
                    .find(|c| c.id == entry.companion_id)
                    .cloned()
            })
            .take(limit)
            .collect())
    }

    async fn companions_by_author(&self, author: &str) -> StoreResult<Vec<Companion>> {
        let tables = self.tables.read().await;
        Ok(tables
            .companions
            .iter()
            .rev()
            .filter(|c| c.author == author)
            .cloned()
            .collect())
    }

    async fn count_by_author(&self, author: &str) -> StoreResult<usize> {
        let tables = self.tables.read().await;
        Ok(tables.companions.iter().filter(|c| c.author == author).count())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
