use super::transport::{TranscriptType, TransportEvent, TransportMessage};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

/// Lifecycle of one call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CallStatus {
    Inactive,
    Connecting,
    Active,
    Finished,
}

impl CallStatus {
    /// Inactive and finished calls look the same to the user
    pub fn is_idle(&self) -> bool {
        matches!(self, CallStatus::Inactive | CallStatus::Finished)
    }
}

impl fmt::Display for CallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CallStatus::Inactive => "INACTIVE",
            CallStatus::Connecting => "CONNECTING",
            CallStatus::Active => "ACTIVE",
            CallStatus::Finished => "FINISHED",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Assistant,
    User,
}

/// A finalized utterance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptMessage {
    pub role: Role,
    pub content: String,
}

impl TranscriptMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// A user action attempted in a state that does not allow it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
    #[error("cannot {action} while the call is {status}")]
    InvalidTransition {
        action: &'static str,
        status: CallStatus,
    },
}

/// Observable state of a call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallState {
    pub status: CallStatus,

    /// Local microphone flag, set optimistically
    pub is_muted: bool,

    /// Whether either side is currently speaking
    pub is_speaking: bool,

    /// Final transcript, most recent first
    pub messages: VecDeque<TranscriptMessage>,
}

impl Default for CallState {
    fn default() -> Self {
        Self {
            status: CallStatus::Inactive,
            is_muted: false,
            is_speaking: false,
            messages: VecDeque::new(),
        }
    }
}

impl CallState {
    /// Enter CONNECTING for a new call, discarding the previous transcript
    pub fn begin_connecting(&mut self) -> Result<(), CallError> {
        self.ensure_idle("start a call")?;

        self.messages.clear();
        self.is_speaking = false;
        self.status = CallStatus::Connecting;
        Ok(())
    }

    /// Optimistically finish the call before the transport confirms
    pub fn finish(&mut self) -> Result<(), CallError> {
        match self.status {
            CallStatus::Connecting | CallStatus::Active => {
                self.status = CallStatus::Finished;
                self.is_speaking = false;
                Ok(())
            }
            status => Err(CallError::InvalidTransition {
                action: "disconnect",
                status,
            }),
        }
    }

    pub fn ensure_idle(&self, action: &'static str) -> Result<(), CallError> {
        if self.status.is_idle() {
            Ok(())
        } else {
            Err(CallError::InvalidTransition {
                action,
                status: self.status,
            })
        }
    }

    pub fn ensure_active(&self, action: &'static str) -> Result<(), CallError> {
        if self.status == CallStatus::Active {
            Ok(())
        } else {
            Err(CallError::InvalidTransition {
                action,
                status: self.status,
            })
        }
    }

    /// Apply one transport event. Never issues commands.
    pub fn apply(&mut self, event: &TransportEvent) {
        match event {
            TransportEvent::CallStart => match self.status {
                CallStatus::Inactive | CallStatus::Connecting => {
                    self.status = CallStatus::Active;
                }
                CallStatus::Active => {}
                CallStatus::Finished => {
                    debug!("Ignoring call-start for a finished call");
                }
            },

            TransportEvent::CallEnd => {
                self.status = CallStatus::Finished;
                self.is_speaking = false;
            }

            TransportEvent::SpeechStart => self.is_speaking = true,
            TransportEvent::SpeechEnd => self.is_speaking = false,

            TransportEvent::Message(TransportMessage::Transcript {
                role,
                transcript_type: TranscriptType::Final,
                transcript,
            }) => {
                if self.status == CallStatus::Active {
                    self.messages
                        .push_front(TranscriptMessage::new(*role, transcript.clone()));
                } else {
                    debug!("Dropping transcript received while {}", self.status);
                }
            }

            TransportEvent::Message(_) => {}

            TransportEvent::Error(err) => {
                warn!("Voice transport error: {}", err);
            }
        }
    }
}
