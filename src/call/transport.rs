use super::assistant::{AssistantConfig, AssistantOverrides};
use super::state::Role;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::debug;

/// Errors reported by a voice transport
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("{command} command failed: {reason}")]
    CommandFailed {
        command: &'static str,
        reason: String,
    },

    /// Error reported by the remote voice service
    #[error("remote error: {0}")]
    Remote(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptType {
    Partial,
    Final,
}

/// Client message pushed by the voice service during a call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum TransportMessage {
    Transcript {
        role: Role,
        #[serde(rename = "transcriptType")]
        transcript_type: TranscriptType,
        transcript: String,
    },

    /// Any message type the call session does not consume
    #[serde(other)]
    Other,
}

/// Events a voice transport delivers to its listeners
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    CallStart,
    CallEnd,
    SpeechStart,
    SpeechEnd,
    Message(TransportMessage),
    Error(TransportError),
}

pub type EventSink = mpsc::UnboundedSender<TransportEvent>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Real-time voice transport
///
/// One instance per process, shared by reference with every call session.
/// Commands are fire-and-forget: their outcome arrives as events.
#[async_trait::async_trait]
pub trait VoiceTransport: Send + Sync {
    /// Begin a call with the given assistant
    async fn start(
        &self,
        assistant: &AssistantConfig,
        overrides: &AssistantOverrides,
    ) -> Result<(), TransportError>;

    /// End the current call
    async fn stop(&self) -> Result<(), TransportError>;

    async fn set_muted(&self, muted: bool) -> Result<(), TransportError>;

    fn is_muted(&self) -> bool;

    /// Register an event listener
    fn on(&self, sink: EventSink) -> ListenerId;

    /// Deregister a listener; unknown ids are ignored
    fn off(&self, id: ListenerId);

    /// Transport name for logging
    fn name(&self) -> &str;
}

/// Listener registry shared by transport implementations
#[derive(Debug, Default)]
pub struct Listeners {
    next_id: AtomicU64,
    sinks: Mutex<HashMap<ListenerId, EventSink>>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, sink: EventSink) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.sinks.lock().insert(id, sink);
        id
    }

    pub fn remove(&self, id: ListenerId) -> bool {
        self.sinks.lock().remove(&id).is_some()
    }

    /// Deliver an event to every listener, dropping listeners whose receiver is gone
    pub fn emit(&self, event: &TransportEvent) {
        self.sinks
            .lock()
            .retain(|_, sink| sink.send(event.clone()).is_ok());
    }

    pub fn len(&self) -> usize {
        self.sinks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Listener registration that is undone when dropped
pub struct Subscription<'t> {
    transport: &'t dyn VoiceTransport,
    id: ListenerId,
}

impl<'t> Subscription<'t> {
    pub fn register(transport: &'t dyn VoiceTransport, sink: EventSink) -> Self {
        let id = transport.on(sink);
        debug!("Subscribed {:?} to {}", id, transport.name());
        Self { transport, id }
    }
}

impl Drop for Subscription<'_> {
    fn drop(&mut self) {
        self.transport.off(self.id);
        debug!("Unsubscribed {:?} from {}", self.id, self.transport.name());
    }
}
