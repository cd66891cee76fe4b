//! Orchestrator event stream
//!
//! Events describe state changes of the orchestrator so any UI can mirror
//! them. They carry ids and small summaries; consumers re-read full records
//! through the orchestrator when they need them.

use crate::orchestration::{AgentId, AgentStatus, StepStatus, ToolId, WorkflowId, WorkflowStatus};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use serde::{Deserialize, Serialize};

/// State changes published by the orchestrator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrchestratorEvent {
    /// Starter agents and static tools are in place
    Initialized { agents: usize, tools: usize },

    // ===== Agent Events =====
    AgentCreated { id: AgentId, name: String },

    AgentStatusChanged {
        id: AgentId,
        status: AgentStatus,
        current_task: Option<String>,
    },

    TaskAssigned {
        agent_id: AgentId,
        workflow_id: WorkflowId,
        task: String,
    },

    // ===== Workflow Events =====
    WorkflowCreated { id: WorkflowId, name: String, steps: usize },

    WorkflowStarted { id: WorkflowId },

    StepFinished {
        workflow_id: WorkflowId,
        step_id: String,
        status: StepStatus,
        progress: u8,
    },

    WorkflowFinished {
        id: WorkflowId,
        status: WorkflowStatus,
        error: Option<String>,
    },

    // ===== Tool Events =====
    ToolRegistered { id: ToolId, name: String },

    ToolEvolved {
        id: ToolId,
        usage_count: u64,
        success_rate: f64,
    },
}

/// Event bus using a bounded crossbeam channel
///
/// Publishing never blocks: when the channel is full the event is dropped.
pub struct EventBus {
    tx: Sender<OrchestratorEvent>,
    rx: Receiver<OrchestratorEvent>,
}

impl EventBus {
    /// Create a new event bus with specified capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = bounded(capacity.max(1));
        Self { tx, rx }
    }

    /// Publish an event; returns false if it was dropped
    pub fn emit(&self, event: OrchestratorEvent) -> bool {
        match self.tx.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                tracing::debug!(?event, "event channel full, dropping event");
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    /// Get a receiver clone; receivers compete for events
    pub fn subscribe(&self) -> Receiver<OrchestratorEvent> {
        self.rx.clone()
    }
}
