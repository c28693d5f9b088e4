use crate::companion::Companion;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Assistant definition sent with the start command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantConfig {
    pub name: String,

    /// Spoken first; may reference `{{topic}}`
    pub first_message: String,

    pub transcriber: TranscriberConfig,
    pub voice: VoiceConfig,
    pub model: ModelConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriberConfig {
    pub provider: String,
    pub model: String,
    pub language: String,
}

impl Default for TranscriberConfig {
    fn default() -> Self {
        Self {
            provider: "deepgram".to_string(),
            model: "nova-3".to_string(),
            language: "en".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceConfig {
    pub provider: String,
    pub voice_id: String,
    pub stability: f32,
    pub similarity_boost: f32,
    pub speed: f32,
    pub style: f32,
    pub use_speaker_boost: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub provider: String,
    pub model: String,
    pub messages: Vec<PromptMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: String,
    pub content: String,
}

/// Per-call overrides: template variables and which messages to stream back
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantOverrides {
    pub variable_values: ConversationVariables,
    pub client_messages: Vec<String>,
    pub server_messages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationVariables {
    pub subject: String,
    pub topic: String,
    pub style: String,
}

impl AssistantOverrides {
    /// Overrides for a call with `companion`; only transcripts are streamed back
    pub fn for_companion(companion: &Companion) -> Self {
        Self {
            variable_values: ConversationVariables {
                subject: companion.subject.as_str().to_string(),
                topic: companion.topic.clone(),
                style: companion.style.clone(),
            },
            client_messages: vec!["transcript".to_string()],
            server_messages: Vec::new(),
        }
    }
}

const DEFAULT_FIRST_MESSAGE: &str =
    "Hello, let's start the session. Today we'll be talking about {{topic}}.";

const DEFAULT_SYSTEM_PROMPT: &str = "You are a knowledgeable tutor in a real-time voice \
session with a student. Teach the topic {{ topic }} within the subject {{ subject }}. \
Break the topic into small parts and cover one part at a time, checking now and then that \
the student is following. Keep your style of conversation {{ style }}. Keep responses \
short, as in a real spoken conversation, and do not use special characters since \
everything you write is spoken aloud.";

/// Resolves a companion's voice and style to an assistant configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VoiceCatalog {
    pub assistant_name: String,
    pub first_message: String,
    pub system_prompt: String,
    pub transcriber: TranscriberConfig,
    pub voice_provider: String,

    /// Used when a voice/style pair is missing from `voices`
    pub default_voice_id: String,

    /// voice → style → provider voice id
    pub voices: HashMap<String, HashMap<String, String>>,

    pub model_provider: String,
    pub model: String,
}

impl Default for VoiceCatalog {
    fn default() -> Self {
        Self {
            assistant_name: "Companion".to_string(),
            first_message: DEFAULT_FIRST_MESSAGE.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            transcriber: TranscriberConfig::default(),
            voice_provider: "11labs".to_string(),
            default_voice_id: "sarah".to_string(),
            voices: HashMap::new(),
            model_provider: "openai".to_string(),
            model: "gpt-4".to_string(),
        }
    }
}

impl VoiceCatalog {
    pub fn voice_id(&self, voice: &str, style: &str) -> &str {
        self.voices
            .get(voice)
            .and_then(|styles| styles.get(style))
            .map_or(self.default_voice_id.as_str(), String::as_str)
    }

    pub fn configure(&self, voice: &str, style: &str) -> AssistantConfig {
        AssistantConfig {
            name: self.assistant_name.clone(),
            first_message: self.first_message.clone(),
            transcriber: self.transcriber.clone(),
            voice: VoiceConfig {
                provider: self.voice_provider.clone(),
                voice_id: self.voice_id(voice, style).to_string(),
                stability: 0.4,
                similarity_boost: 0.8,
                speed: 1.0,
                style: 0.5,
                use_speaker_boost: true,
            },
            model: ModelConfig {
                provider: self.model_provider.clone(),
                model: self.model.clone(),
                messages: vec![PromptMessage {
                    role: "system".to_string(),
                    content: self.system_prompt.clone(),
                }],
            },
        }
    }
}
