//! Agent Orchestration System
//!
//! In-memory registries of agents and tools plus a sequential workflow engine:
//! - Agent registry: templates, status, capability queries, scoring
//! - Tool registry: static and dynamic tools with usage statistics
//! - Workflows: ordered steps, each bound to one agent
//! - Step runners: the pluggable unit of work behind a step
//!
//! # Example
//!
//! ```no_run
//! use atelier_core::orchestration::{Orchestrator, TaskRequest, TaskRequirements};
//! use atelier_core::AtelierConfig;
//!
//! # async fn demo() -> atelier_core::Result<()> {
//! let orchestrator = Orchestrator::new(&AtelierConfig::default());
//! orchestrator.initialize();
//!
//! let agent = orchestrator
//!     .best_agent_for_task("component-creation", &TaskRequirements::default())
//!     .expect("starter agents are available");
//! let task = TaskRequest::of_type("component-creation").with_description("Create navbar");
//! let workflow_id = orchestrator.assign_task(agent.id.as_str(), task)?;
//! let workflow = orchestrator.execute_workflow(workflow_id.as_str(), None).await?;
//! println!("{} finished with status {:?}", workflow.name, workflow.status);
//! # Ok(())
//! # }
//! ```

mod agents;
mod orchestrator;
mod performance;
mod runner;
mod templates;
mod tools;
mod types;
mod workflow;

// Re-export types
pub use types::{
    step_id, AgentId, AgentKind, AgentOverrides, AgentPerformance, AgentRecord, AgentStatus,
    ParameterType, StepSpec, StepStatus, TaskRequest, TaskRequirements, ToolId, ToolKind,
    ToolParameter, ToolPerformance, ToolRecord, ToolSpec, UsageOutcome, Workflow, WorkflowId,
    WorkflowStatus, WorkflowStep,
};

pub use templates::{AgentTemplate, TemplateDefinition};

// Registries, usable on their own
pub use agents::{score, AgentRegistry};
pub use tools::ToolRegistry;
pub use workflow::WorkflowStore;

pub use performance::{blend_average, reconstruct_success_rate};

// Engine
pub use orchestrator::Orchestrator;
pub use runner::{SimulatedRunner, StepOutcome, StepRequest, StepRunner};
