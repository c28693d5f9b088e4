//! Companion records and the subjects they teach

mod model;
mod subject;

pub use model::{Companion, NewCompanion, SessionHistoryEntry};
pub use subject::{Subject, UnknownSubject};
