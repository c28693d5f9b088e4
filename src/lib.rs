pub mod call;
pub mod companion;
pub mod config;
pub mod directory;
pub mod http;
pub mod nats;
pub mod navigation;
pub mod store;

pub use call::{
    CallSession, CallState, CallStatus, CallView, TransportEvent, VoiceCatalog, VoiceTransport,
};
pub use companion::{Companion, NewCompanion, SessionHistoryEntry, Subject};
pub use config::Config;
pub use directory::{Caller, CompanionFilter, DirectoryError, DirectoryService, QuotaPolicy};
pub use http::{create_router, AppState};
pub use nats::NatsTransport;
pub use store::{CompanionStore, MemoryStore, SqliteStore, StoreFactory};
