use crate::companion::Companion;

/// A filtered, range-sliced companion select
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanionQuery {
    /// Case-insensitive substring of the subject
    pub subject: Option<String>,

    /// Case-insensitive substring of the topic or the name
    pub topic: Option<String>,

    /// Zero-based index of the first row
    pub offset: usize,

    /// Maximum number of rows
    pub limit: usize,
}

impl CompanionQuery {
    /// Whether a companion passes the subject and topic filters
    pub fn matches(&self, companion: &Companion) -> bool {
        let subject_ok = self
            .subject
            .as_deref()
            .map_or(true, |needle| contains_ignore_case(companion.subject.as_str(), needle));

        let topic_ok = self.topic.as_deref().map_or(true, |needle| {
            contains_ignore_case(&companion.topic, needle)
                || contains_ignore_case(&companion.name, needle)
        });

        subject_ok && topic_ok
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
