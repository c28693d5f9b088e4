use super::assistant::{AssistantConfig, AssistantOverrides, VoiceCatalog};
use super::state::{CallError, CallState, CallStatus};
use super::transport::{Subscription, TransportEvent, VoiceTransport};
use crate::companion::Companion;
use crate::directory::{Caller, DirectoryService};
use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{error, info};

/// One voice conversation with a companion
///
/// Listens to the transport from construction until drop. Events are queued
/// and applied by [`process_next`](Self::process_next) /
/// [`process_pending`](Self::process_pending) on the owner's task, so user
/// actions and event handling never interleave.
pub struct CallSession<'t> {
    transport: &'t dyn VoiceTransport,

    companion: Companion,

    /// Assistant sent on every start
    assistant: AssistantConfig,

    state: CallState,

    /// Transport events not yet applied
    events: mpsc::UnboundedReceiver<TransportEvent>,

    /// Deregisters the listener on drop
    _subscription: Subscription<'t>,
}

impl<'t> CallSession<'t> {
    pub fn new(
        transport: &'t dyn VoiceTransport,
        companion: Companion,
        catalog: &VoiceCatalog,
    ) -> Self {
        let (sink, events) = mpsc::unbounded_channel();
        let subscription = Subscription::register(transport, sink);
        let assistant = catalog.configure(&companion.voice, &companion.style);

        Self {
            transport,
            companion,
            assistant,
            state: CallState::default(),
            events,
            _subscription: subscription,
        }
    }

    pub fn state(&self) -> &CallState {
        &self.state
    }

    pub fn status(&self) -> CallStatus {
        self.state.status
    }

    pub fn companion(&self) -> &Companion {
        &self.companion
    }

    pub fn assistant(&self) -> &AssistantConfig {
        &self.assistant
    }

    /// Start a call
    ///
    /// Moves to CONNECTING and asks the transport to begin; the call becomes
    /// ACTIVE when the transport reports `call-start`. A failed command is
    /// logged and leaves the call CONNECTING.
    pub async fn start(&mut self) -> Result<(), CallError> {
        self.state.begin_connecting()?;

        info!(
            "Starting call with {} ({}, {})",
            self.companion.name, self.companion.subject, self.companion.topic
        );

        let overrides = AssistantOverrides::for_companion(&self.companion);
        if let Err(e) = self.transport.start(&self.assistant, &overrides).await {
            error!("Failed to start call: {}", e);
        }

        Ok(())
    }

    /// Record the session in the directory history, then start the call.
    /// Nothing is sent to the transport if the history entry cannot be written.
    pub async fn start_recorded(
        &mut self,
        directory: &DirectoryService,
        caller: &Caller,
    ) -> Result<()> {
        self.state.ensure_idle("start a call")?;

        directory
            .record_session_start(caller, &self.companion.id)
            .await?;

        self.start().await?;
        Ok(())
    }

    /// Flip the microphone; only while ACTIVE. Returns the new muted flag.
    pub async fn toggle_microphone(&mut self) -> Result<bool, CallError> {
        self.state.ensure_active("toggle the microphone")?;

        let muted = !self.transport.is_muted();
        if let Err(e) = self.transport.set_muted(muted).await {
            error!("Failed to set microphone muted={}: {}", muted, e);
        }
        self.state.is_muted = muted;

        Ok(muted)
    }

    /// End the call without waiting for the transport to confirm
    pub async fn disconnect(&mut self) -> Result<(), CallError> {
        self.state.finish()?;

        info!("Disconnecting call with {}", self.companion.name);

        if let Err(e) = self.transport.stop().await {
            error!("Failed to stop call: {}", e);
        }

        Ok(())
    }

    /// Apply a transport event directly
    pub fn apply(&mut self, event: TransportEvent) {
        self.state.apply(&event);
    }

    /// Wait for the next transport event and apply it.
    /// Returns `None` once the transport has dropped this listener.
    pub async fn process_next(&mut self) -> Option<CallStatus> {
        let event = self.events.recv().await?;
        self.state.apply(&event);
        Some(self.state.status)
    }

    /// Apply every event already queued, returning how many were applied
    pub fn process_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events.try_recv() {
            self.state.apply(&event);
            applied += 1;
        }
        applied
    }
}
