use super::state::{CallState, CallStatus, Role};
use crate::companion::Companion;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Avatar {
    /// Subject icon
    Idle,
    /// Pulsing subject icon
    Connecting,
    /// Soundwave animation
    Soundwave,
}

/// Soundwave animation playback; stopping rewinds, it never pauses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Animation {
    Playing,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrimaryAction {
    StartCall,
    Connecting,
    EndCall,
}

impl PrimaryAction {
    pub fn label(&self) -> &'static str {
        match self {
            PrimaryAction::StartCall => "Start a call",
            PrimaryAction::Connecting => "Connecting...",
            PrimaryAction::EndCall => "End call",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptLine {
    pub role: Role,
    pub speaker: String,
    pub content: String,
}

impl fmt::Display for TranscriptLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.speaker, self.content)
    }
}

/// What the call screen shows for a given state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallView {
    pub avatar: Avatar,
    pub animation: Animation,
    pub subject_color: &'static str,
    pub subject_icon: String,
    pub mic_enabled: bool,
    pub mic_muted: bool,
    pub mic_label: &'static str,
    pub primary_action: PrimaryAction,

    /// Most recent first
    pub transcript: Vec<TranscriptLine>,
}

impl CallView {
    pub fn render(state: &CallState, companion: &Companion, user_name: &str) -> Self {
        let avatar = match state.status {
            CallStatus::Inactive | CallStatus::Finished => Avatar::Idle,
            CallStatus::Connecting => Avatar::Connecting,
            CallStatus::Active => Avatar::Soundwave,
        };

        let primary_action = match state.status {
            CallStatus::Active => PrimaryAction::EndCall,
            CallStatus::Connecting => PrimaryAction::Connecting,
            CallStatus::Inactive | CallStatus::Finished => PrimaryAction::StartCall,
        };

        let companion_speaker = speaker_name(&companion.name);
        let transcript = state
            .messages
            .iter()
            .map(|message| TranscriptLine {
                role: message.role,
                speaker: match message.role {
                    Role::Assistant => companion_speaker.clone(),
                    Role::User => user_name.to_string(),
                },
                content: message.content.clone(),
            })
            .collect();

        Self {
            avatar,
            animation: if state.is_speaking {
                Animation::Playing
            } else {
                Animation::Stopped
            },
            subject_color: companion.subject.color(),
            subject_icon: companion.subject.icon_path(),
            mic_enabled: state.status == CallStatus::Active,
            mic_muted: state.is_muted,
            mic_label: if state.is_muted {
                "Turn on microphone"
            } else {
                "Turn off microphone"
            },
            primary_action,
            transcript,
        }
    }
}

/// Short speaker label for a companion: its first word without `,` or `.`
pub fn speaker_name(companion_name: &str) -> String {
    companion_name
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| !matches!(c, ',' | '.'))
        .collect()
}
