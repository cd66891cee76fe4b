//! Atelier Core - Agent orchestration library for Atelier
//!
//! This crate provides the UI-agnostic back end of the Atelier workbench:
//! - Model capability table and model router
//! - Agent registry with specialised templates
//! - Tool registry with usage-driven evolution
//! - Sequential workflow engine with a pluggable step runner
//! - Configuration loading
//!
//! Any UI (HTTP, desktop, CLI) drives it through an [`Orchestrator`] handle and
//! mirrors state by subscribing to [`OrchestratorEvent`]s.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────┐  operations   ┌──────────────────┐
//! │   Any UI          │ ─────────────→│   atelier-core   │
//! │ (HTTP, GUI, CLI)  │               │   Orchestrator   │
//! │                   │ ←─────────────│                  │
//! └───────────────────┘    events     └────────┬─────────┘
//!                                              │ StepRunner
//!                                              ▼
//!                                     generation backend
//! ```

// Public API modules
pub mod error;
pub mod events;

pub mod config;

// Model table and routing
pub mod models;
pub mod router;

// Agent orchestration system
pub mod orchestration;

// Re-export commonly used types
pub use error::{AtelierError, Result};
pub use events::{EventBus, OrchestratorEvent};

pub use config::{load_config, sample_config, AtelierConfig, ConfigError};

pub use models::{capabilities, capabilities_for, list_models, AiModel, ModelCapability};
pub use router::{
    select_model_for_agent_type, select_model_for_context_size, select_model_for_task,
};

pub use orchestration::{
    AgentId, AgentKind, AgentOverrides, AgentRecord, AgentStatus, AgentTemplate, Orchestrator,
    SimulatedRunner, StepOutcome, StepRequest, StepRunner, StepSpec, StepStatus, TaskRequest,
    TaskRequirements, ToolId, ToolRecord, ToolSpec, UsageOutcome, Workflow, WorkflowId,
    WorkflowStatus,
};

/// Get the crate version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
