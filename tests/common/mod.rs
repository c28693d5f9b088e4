// Shared test fixtures: a scripted voice transport and sample companions

#![allow(dead_code)]

use chrono::Utc;
use learning_companion::call::{
    AssistantConfig, AssistantOverrides, EventSink, ListenerId, Listeners, TransportError,
    TransportEvent, VoiceTransport,
};
use learning_companion::{Companion, NewCompanion, Subject};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// A command the controller issued to the transport
#[derive(Debug, Clone, PartialEq)]
pub enum Issued {
    Start {
        assistant: AssistantConfig,
        overrides: AssistantOverrides,
    },
    Stop,
    SetMuted(bool),
}

/// In-process transport: records commands, lets the test inject events
#[derive(Default)]
pub struct ScriptedTransport {
    listeners: Listeners,
    muted: AtomicBool,
    fail_commands: AtomicBool,
    issued: Mutex<Vec<Issued>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent command fail
    pub fn fail_commands(&self) {
        self.fail_commands.store(true, Ordering::SeqCst);
    }

    pub fn emit(&self, event: TransportEvent) {
        self.listeners.emit(&event);
    }

    pub fn issued(&self) -> Vec<Issued> {
        self.issued.lock().clone()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn record(&self, command: &'static str, issued: Issued) -> Result<(), TransportError> {
        self.issued.lock().push(issued);
        if self.fail_commands.load(Ordering::SeqCst) {
            return Err(TransportError::CommandFailed {
                command,
                reason: "scripted failure".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl VoiceTransport for ScriptedTransport {
    async fn start(
        &self,
        assistant: &AssistantConfig,
        overrides: &AssistantOverrides,
    ) -> Result<(), TransportError> {
        self.record(
            "start",
            Issued::Start {
                assistant: assistant.clone(),
                overrides: overrides.clone(),
            },
        )
    }

    async fn stop(&self) -> Result<(), TransportError> {
        self.record("stop", Issued::Stop)
    }

    async fn set_muted(&self, muted: bool) -> Result<(), TransportError> {
        self.muted.store(muted, Ordering::SeqCst);
        self.record("set-muted", Issued::SetMuted(muted))
    }

    fn is_muted(&self) -> bool {
        self.muted.load(Ordering::SeqCst)
    }

    fn on(&self, sink: EventSink) -> ListenerId {
        self.listeners.add(sink)
    }

    fn off(&self, id: ListenerId) {
        self.listeners.remove(id);
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

pub fn sample_companion() -> Companion {
    Companion {
        id: "companion-1".to_string(),
        subject: Subject::Science,
        topic: "The neural network of the brain".to_string(),
        name: "Neura the Brainy Explorer".to_string(),
        voice: "female".to_string(),
        style: "casual".to_string(),
        author: "user-1".to_string(),
        created_at: Utc::now(),
    }
}

pub fn new_companion(subject: Subject, name: &str, topic: &str) -> NewCompanion {
    NewCompanion {
        subject,
        topic: topic.to_string(),
        name: name.to_string(),
        voice: "male".to_string(),
        style: "formal".to_string(),
    }
}
