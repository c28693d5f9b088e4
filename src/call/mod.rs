//! Voice call session management
//!
//! This module provides the `CallSession` controller that manages:
//! - The call lifecycle (inactive, connecting, active, finished)
//! - Transport event subscription, scoped to the session's lifetime
//! - The most-recent-first transcript of final utterances
//! - Microphone mute and speaking-indicator state
//! - A presentation model derived from the session state
//! - Keyboard commands for the interactive call client

mod assistant;
mod commands;
mod session;
mod state;
mod transport;
mod view;

pub use assistant::{
    AssistantConfig, AssistantOverrides, ConversationVariables, ModelConfig, PromptMessage,
    TranscriberConfig, VoiceCatalog, VoiceConfig,
};
pub use commands::{parse_command, spawn_command_reader, ParsedLine, UserCommand};
pub use session::CallSession;
pub use state::{CallError, CallState, CallStatus, Role, TranscriptMessage};
pub use transport::{
    EventSink, ListenerId, Listeners, Subscription, TranscriptType, TransportError,
    TransportEvent, TransportMessage, VoiceTransport,
};
pub use view::{speaker_name, Animation, Avatar, CallView, PrimaryAction, TranscriptLine};
