use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Subject a companion teaches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    Maths,
    Language,
    Science,
    History,
    Coding,
    Economics,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown subject: {0}")]
pub struct UnknownSubject(pub String);

impl Subject {
    pub const ALL: [Subject; 6] = [
        Subject::Maths,
        Subject::Language,
        Subject::Science,
        Subject::History,
        Subject::Coding,
        Subject::Economics,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Subject::Maths => "maths",
            Subject::Language => "language",
            Subject::Science => "science",
            Subject::History => "history",
            Subject::Coding => "coding",
            Subject::Economics => "economics",
        }
    }

    /// Avatar background colour
    pub fn color(&self) -> &'static str {
        match self {
            Subject::Maths => "#FFDA6E",
            Subject::Language => "#BDE7FF",
            Subject::Science => "#E5D0FF",
            Subject::History => "#FFECC8",
            Subject::Coding => "#FFC8E4",
            Subject::Economics => "#C8FFDF",
        }
    }

    pub fn icon_path(&self) -> String {
        format!("/icons/{}.svg", self.as_str())
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Subject {
    type Err = UnknownSubject;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Subject::ALL
            .into_iter()
            .find(|subject| subject.as_str() == needle)
            .ok_or_else(|| UnknownSubject(s.to_string()))
    }
}
