//! Server state management

use atelier_core::{AtelierConfig, Orchestrator, OrchestratorEvent};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: AtelierConfig,
    pub orchestrator: Arc<Orchestrator>,
    /// Fan-out of orchestrator events to WebSocket clients
    pub events: broadcast::Sender<OrchestratorEvent>,
}

impl AppState {
    pub fn new(config: AtelierConfig) -> Self {
        let orchestrator = Arc::new(Orchestrator::new(&config));
        let (events, _) = broadcast::channel(config.orchestrator.event_capacity.max(1));
        Self {
            config,
            orchestrator,
            events,
        }
    }

    /// Forward orchestrator events into the broadcast channel
    ///
    /// The orchestrator publishes on a blocking channel, so the pump lives on
    /// the blocking pool and ends when the orchestrator is dropped.
    pub fn spawn_event_bridge(&self) -> tokio::task::JoinHandle<()> {
        let source = self.orchestrator.subscribe();
        let sink = self.events.clone();
        tokio::task::spawn_blocking(move || {
            while let Ok(event) = source.recv() {
                // No WebSocket clients connected is fine
                let _ = sink.send(event);
            }
            tracing::debug!("orchestrator event bridge stopped");
        })
    }
}
