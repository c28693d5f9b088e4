use super::messages::{CallCommandMessage, TransportEventMessage};
use crate::call::{
    AssistantConfig, AssistantOverrides, EventSink, ListenerId, Listeners, TransportError,
    TransportEvent, VoiceTransport,
};
use anyhow::{Context, Result};
use async_nats::Client;
use futures::stream::StreamExt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Subject the voice service publishes call events on
pub fn events_subject(call_id: &str) -> String {
    format!("voice.event.{}", call_id)
}

/// Subject the voice service receives call commands on
pub fn commands_subject(call_id: &str) -> String {
    format!("voice.command.{}", call_id)
}

/// Voice transport that relays commands and events over NATS
pub struct NatsTransport {
    client: Client,
    call_id: String,

    /// Last mute state requested
    muted: AtomicBool,

    listeners: Arc<Listeners>,

    /// Forwards NATS event messages to listeners
    event_task: JoinHandle<()>,
}

impl NatsTransport {
    /// Connect to NATS and start listening for events of `call_id`
    pub async fn connect(url: &str, call_id: String) -> Result<Self> {
        info!("Connecting to NATS at {}", url);

        let client = async_nats::connect(url)
            .await
            .context("Failed to connect to NATS")?;

        info!("Connected to NATS successfully");

        let subject = events_subject(&call_id);
        let mut subscriber = client
            .subscribe(subject.clone())
            .await
            .context("Failed to subscribe to call events")?;

        info!("Subscribed to {}", subject);

        let listeners = Arc::new(Listeners::new());
        let task_listeners = Arc::clone(&listeners);

        let event_task = tokio::spawn(async move {
            while let Some(msg) = subscriber.next().await {
                match serde_json::from_slice::<TransportEventMessage>(&msg.payload) {
                    Ok(event) => task_listeners.emit(&TransportEvent::from(event)),
                    Err(e) => warn!("Failed to parse call event: {}", e),
                }
            }

            info!("Call event stream closed");
        });

        Ok(Self {
            client,
            call_id,
            muted: AtomicBool::new(false),
            listeners,
            event_task,
        })
    }

    pub fn call_id(&self) -> &str {
        &self.call_id
    }

    async fn publish(&self, command: CallCommandMessage) -> Result<(), TransportError> {
        let name = command.name();
        let subject = commands_subject(&self.call_id);

        let payload = serde_json::to_vec(&command).map_err(|e| TransportError::CommandFailed {
            command: name,
            reason: e.to_string(),
        })?;

        self.client
            .publish(subject.clone(), payload.into())
            .await
            .map_err(|e| TransportError::CommandFailed {
                command: name,
                reason: e.to_string(),
            })?;

        debug!("Published {} command to {}", name, subject);

        Ok(())
    }
}

#[async_trait::async_trait]
impl VoiceTransport for NatsTransport {
    async fn start(
        &self,
        assistant: &AssistantConfig,
        overrides: &AssistantOverrides,
    ) -> Result<(), TransportError> {
        self.publish(CallCommandMessage::Start {
            assistant: assistant.clone(),
            overrides: overrides.clone(),
        })
        .await
    }

    async fn stop(&self) -> Result<(), TransportError> {
        self.publish(CallCommandMessage::Stop).await
    }

    async fn set_muted(&self, muted: bool) -> Result<(), TransportError> {
        self.muted.store(muted, Ordering::SeqCst);
        self.publish(CallCommandMessage::SetMuted { muted }).await
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
        "nats"
    }
}

impl Drop for NatsTransport {
    fn drop(&mut self) {
        self.event_task.abort();
    }
}
