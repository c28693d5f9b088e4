use learning_companion::call::{
    AssistantOverrides, Role, TranscriptType, TransportError, TransportEvent, TransportMessage,
    VoiceCatalog,
};
use learning_companion::nats::client::{commands_subject, events_subject};
use learning_companion::nats::messages::{CallCommandMessage, TransportEventMessage};
use learning_companion::{Companion, Subject};

fn companion() -> Companion {
    Companion {
        id: "c-1".to_string(),
        subject: Subject::Maths,
        topic: "Fractions".to_string(),
        name: "Countsy".to_string(),
        voice: "male".to_string(),
        style: "formal".to_string(),
        author: "u-1".to_string(),
        created_at: chrono::Utc::now(),
    }
}

#[test]
fn test_subjects() {
    assert_eq!(commands_subject("call-1"), "voice.command.call-1");
    assert_eq!(events_subject("call-1"), "voice.event.call-1");
}

#[test]
fn test_start_command_serialization() {
    let companion = companion();
    let msg = CallCommandMessage::Start {
        assistant: VoiceCatalog::default().configure("male", "formal"),
        overrides: AssistantOverrides::for_companion(&companion),
    };

    let json: serde_json::Value = serde_json::to_value(&msg).unwrap();
    assert_eq!(json["command"], "start");
    assert_eq!(
        json["assistant"]["firstMessage"],
        "Hello, let's start the session. Today we'll be talking about {{topic}}."
    );
    assert_eq!(json["assistant"]["voice"]["voiceId"], "sarah");
    assert_eq!(json["overrides"]["variableValues"]["subject"], "maths");
    assert_eq!(json["overrides"]["variableValues"]["topic"], "Fractions");
    assert_eq!(json["overrides"]["clientMessages"][0], "transcript");

    let deserialized: CallCommandMessage = serde_json::from_value(json).unwrap();
    assert_eq!(deserialized, msg);
}

#[test]
fn test_set_muted_command() {
    let json = serde_json::to_string(&CallCommandMessage::SetMuted { muted: true }).unwrap();
    assert_eq!(json, r#"{"command":"set-muted","muted":true}"#);
    assert_eq!(CallCommandMessage::Stop.name(), "stop");
}

#[test]
fn test_lifecycle_events_deserialization() {
    let cases = [
        (r#"{"event":"call-start"}"#, TransportEvent::CallStart),
        (r#"{"event":"call-end"}"#, TransportEvent::CallEnd),
        (r#"{"event":"speech-start"}"#, TransportEvent::SpeechStart),
        (r#"{"event":"speech-end"}"#, TransportEvent::SpeechEnd),
    ];

    for (json, expected) in cases {
        let msg: TransportEventMessage = serde_json::from_str(json).unwrap();
        assert_eq!(TransportEvent::from(msg), expected, "{}", json);
    }
}

#[test]
fn test_final_transcript_event() {
    let json = r#"{
        "event": "message",
        "message": {
            "type": "transcript",
            "role": "assistant",
            "transcriptType": "final",
            "transcript": "Hello there"
        }
    }"#;

    let msg: TransportEventMessage = serde_json::from_str(json).unwrap();
    assert_eq!(
        TransportEvent::from(msg),
        TransportEvent::Message(TransportMessage::Transcript {
            role: Role::Assistant,
            transcript_type: TranscriptType::Final,
            transcript: "Hello there".to_string(),
        })
    );
}

#[test]
fn test_unconsumed_message_types() {
    let json = r#"{"event":"message","message":{"type":"speech-update","status":"started"}}"#;

    let msg: TransportEventMessage = serde_json::from_str(json).unwrap();
    assert_eq!(
        TransportEvent::from(msg),
        TransportEvent::Message(TransportMessage::Other)
    );
}

#[test]
fn test_error_event() {
    let msg: TransportEventMessage =
        serde_json::from_str(r#"{"event":"error","error":"ice connection failed"}"#).unwrap();

    assert_eq!(
        TransportEvent::from(msg),
        TransportEvent::Error(TransportError::Remote("ice connection failed".to_string()))
    );
}

#[test]
fn test_unknown_event_is_rejected() {
    assert!(serde_json::from_str::<TransportEventMessage>(r#"{"event":"volume-level"}"#).is_err());
}
