use super::error::{DirectoryError, DirectoryResult};
use super::identity::Caller;
use super::quota::QuotaPolicy;
use crate::companion::{Companion, NewCompanion, SessionHistoryEntry};
use crate::store::{CompanionQuery, CompanionStore};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Directory listing filter; empty strings count as absent
#[derive(Debug, Clone, Deserialize)]
pub struct CompanionFilter {
    pub subject: Option<String>,
    pub topic: Option<String>,

    /// One-based page number
    #[serde(default = "default_page")]
    pub page: usize,

    #[serde(default = "default_page_size")]
    pub limit: usize,
}

impl Default for CompanionFilter {
    fn default() -> Self {
        Self {
            subject: None,
            topic: None,
            page: default_page(),
            limit: default_page_size(),
        }
    }
}

impl CompanionFilter {
    fn to_query(&self) -> DirectoryResult<CompanionQuery> {
        if self.page < 1 {
            return Err(DirectoryError::InvalidInput("page must be at least 1".into()));
        }
        if self.limit < 1 {
            return Err(DirectoryError::InvalidInput("limit must be at least 1".into()));
        }

        Ok(CompanionQuery {
            subject: non_empty(self.subject.as_deref()),
            topic: non_empty(self.topic.as_deref()),
            offset: (self.page - 1).saturating_mul(self.limit),
            limit: self.limit,
        })
    }
}

fn default_page() -> usize {
    1
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Companion directory operations over a store
pub struct DirectoryService {
    store: Arc<dyn CompanionStore>,
    quota: QuotaPolicy,
}

impl DirectoryService {
    pub fn new(store: Arc<dyn CompanionStore>, quota: QuotaPolicy) -> Self {
        info!("Companion directory using {} store", store.name());
        Self { store, quota }
    }

    /// Create a companion authored by the caller
    pub async fn create(&self, caller: &Caller, new: NewCompanion) -> DirectoryResult<Companion> {
        if let Some(field) = new.blank_field() {
            return Err(DirectoryError::InvalidInput(format!("{field} must not be empty")));
        }

        let companion = new.into_companion(
            uuid::Uuid::new_v4().to_string(),
            caller.user_id.clone(),
            Utc::now(),
        );

        let created = self
            .store
            .insert_companion(companion)
            .await
            .map_err(DirectoryError::persistence("Error creating companion"))?;

        info!(
            "Created companion {} ({}) for {}",
            created.id, created.subject, created.author
        );

        Ok(created)
    }

    /// One page of companions matching the filter
    pub async fn list(&self, filter: &CompanionFilter) -> DirectoryResult<Vec<Companion>> {
        let query = filter.to_query()?;
        debug!("Listing companions: {:?}", query);

        self.store
            .select_companions(&query)
            .await
            .map_err(DirectoryError::persistence("Error fetching companions"))
    }

    pub async fn get_by_id(&self, id: &str) -> DirectoryResult<Companion> {
        self.store
            .companion_by_id(id)
            .await
            .map_err(DirectoryError::persistence("Error fetching companion"))?
            .ok_or_else(|| DirectoryError::NotFound(id.to_string()))
    }

    /// Append a session history entry for the caller
    pub async fn record_session_start(
        &self,
        caller: &Caller,
        companion_id: &str,
    ) -> DirectoryResult<SessionHistoryEntry> {
        let entry = SessionHistoryEntry {
            companion_id: companion_id.to_string(),
            user_id: caller.user_id.clone(),
            created_at: Utc::now(),
        };

        let entry = self
            .store
            .insert_session(entry)
            .await
            .map_err(DirectoryError::persistence("Error adding to session history"))?;

        info!("Recorded session with {} for {}", entry.companion_id, entry.user_id);

        Ok(entry)
    }

    /// Companions from the most recent sessions of all users, newest first
    pub async fn recent_sessions(&self, limit: usize) -> DirectoryResult<Vec<Companion>> {
        self.store
            .session_companions(None, limit)
            .await
            .map_err(DirectoryError::persistence("Error fetching recent sessions"))
    }

    /// Companions from one user's most recent sessions, newest first
    pub async fn sessions_for_user(
        &self,
        user_id: &str,
        limit: usize,
    ) -> DirectoryResult<Vec<Companion>> {
        self.store
            .session_companions(Some(user_id), limit)
            .await
            .map_err(DirectoryError::persistence("Error fetching user sessions"))
    }

    pub async fn list_for_author(&self, user_id: &str) -> DirectoryResult<Vec<Companion>> {
        self.store
            .companions_by_author(user_id)
            .await
            .map_err(DirectoryError::persistence("Error fetching user companions"))
    }

    /// Whether the caller may create another companion
    pub async fn check_creation_quota(&self, caller: &Caller) -> DirectoryResult<bool> {
        if self.quota.limit_for(caller).is_none() {
            return Ok(true);
        }

        let existing = self
            .store
            .count_by_author(&caller.user_id)
            .await
            .map_err(DirectoryError::persistence("Error fetching data"))?;

        Ok(self.quota.allows(caller, existing))
    }
}
