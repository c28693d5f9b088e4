use crate::call::{AssistantConfig, AssistantOverrides, TransportError, TransportEvent, TransportMessage};
use serde::{Deserialize, Serialize};

/// Call command published to NATS
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "kebab-case")]
pub enum CallCommandMessage {
    Start {
        assistant: AssistantConfig,
        overrides: AssistantOverrides,
    },
    Stop,
    SetMuted {
        muted: bool,
    },
}

impl CallCommandMessage {
    pub fn name(&self) -> &'static str {
        match self {
            CallCommandMessage::Start { .. } => "start",
            CallCommandMessage::Stop => "stop",
            CallCommandMessage::SetMuted { .. } => "set-muted",
        }
    }
}

/// Call event received from the voice service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum TransportEventMessage {
    CallStart,
    CallEnd,
    SpeechStart,
    SpeechEnd,
    Message { message: TransportMessage },
    Error { error: String },
}

impl From<TransportEventMessage> for TransportEvent {
    fn from(msg: TransportEventMessage) -> Self {
        match msg {
            TransportEventMessage::CallStart => TransportEvent::CallStart,
            TransportEventMessage::CallEnd => TransportEvent::CallEnd,
            TransportEventMessage::SpeechStart => TransportEvent::SpeechStart,
            TransportEventMessage::SpeechEnd => TransportEvent::SpeechEnd,
            TransportEventMessage::Message { message } => TransportEvent::Message(message),
            TransportEventMessage::Error { error } => {
                TransportEvent::Error(TransportError::Remote(error))
            }
        }
    }
}
