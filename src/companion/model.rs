use super::subject::Subject;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A configured AI tutor persona
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Companion {
    /// UUID v4 assigned on creation
    pub id: String,

    pub subject: Subject,

    /// What the companion teaches within its subject (e.g. "Derivatives and integrals")
    pub topic: String,

    /// Display name (e.g. "Neura the Brainy Explorer")
    pub name: String,

    /// Voice family, resolved to a provider voice through the voice catalog
    pub voice: String,

    /// Speaking style (e.g. "formal", "casual")
    pub style: String,

    /// User id of the creator
    pub author: String,

    pub created_at: DateTime<Utc>,
}

/// Create payload for a companion; the directory stamps id, author and timestamp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCompanion {
    pub subject: Subject,
    pub topic: String,
    pub name: String,
    pub voice: String,
    pub style: String,
}

impl NewCompanion {
    /// Returns the name of the first blank field, if any
    pub fn blank_field(&self) -> Option<&'static str> {
        [
            ("name", &self.name),
            ("topic", &self.topic),
            ("voice", &self.voice),
            ("style", &self.style),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
    }

    pub fn into_companion(self, id: String, author: String, created_at: DateTime<Utc>) -> Companion {
        Companion {
            id,
            subject: self.subject,
            topic: self.topic.trim().to_string(),
            name: self.name.trim().to_string(),
            voice: self.voice.trim().to_string(),
            style: self.style.trim().to_string(),
            author,
            created_at,
        }
    }
}

/// Record that a user started a call with a companion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionHistoryEntry {
    pub companion_id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}
