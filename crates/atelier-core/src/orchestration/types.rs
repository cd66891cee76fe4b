//! Orchestration types for agents, tools and workflows
//!
//! Every type here is serializable so a UI can render it directly.

use crate::models::AiModel;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Borrow;

/// Current time as Unix epoch milliseconds
pub(crate) fn now_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

string_id!(
    /// Unique identifier of a registered agent
    AgentId
);
string_id!(
    /// Unique identifier of a registered tool
    ToolId
);
string_id!(
    /// Unique identifier of a workflow
    WorkflowId
);

// ========== Agents ==========

/// Domain category of an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgentKind {
    MetaOrchestration,
    Development,
    DomainSpecific,
    QualitySecurity,
    DataAi,
    DevopsInfrastructure,
    BusinessProduct,
    UserExperience,
}

impl AgentKind {
    pub const ALL: [AgentKind; 8] = [
        AgentKind::MetaOrchestration,
        AgentKind::Development,
        AgentKind::DomainSpecific,
        AgentKind::QualitySecurity,
        AgentKind::DataAi,
        AgentKind::DevopsInfrastructure,
        AgentKind::BusinessProduct,
        AgentKind::UserExperience,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentKind::MetaOrchestration => "meta-orchestration",
            AgentKind::Development => "development",
            AgentKind::DomainSpecific => "domain-specific",
            AgentKind::QualitySecurity => "quality-security",
            AgentKind::DataAi => "data-ai",
            AgentKind::DevopsInfrastructure => "devops-infrastructure",
            AgentKind::BusinessProduct => "business-product",
            AgentKind::UserExperience => "user-experience",
        }
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AgentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgentKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("Unknown agent type: {}", s))
    }
}

/// Status of an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Idle,
    Active,
    Busy,
    Error,
    Offline,
}

impl AgentStatus {
    /// Whether an agent in this status may be offered work
    pub fn is_available(&self) -> bool {
        !matches!(self, AgentStatus::Offline | AgentStatus::Error)
    }
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            AgentStatus::Idle => "idle",
            AgentStatus::Active => "active",
            AgentStatus::Busy => "busy",
            AgentStatus::Error => "error",
            AgentStatus::Offline => "offline",
        };
        f.write_str(label)
    }
}

/// Running performance statistics of an agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentPerformance {
    pub tasks_completed: u64,
    /// Steps whose outcome was a failure
    #[serde(default)]
    pub tasks_failed: u64,
    /// Percentage in [0, 100]
    pub success_rate: f64,
    /// Milliseconds, two-point blended
    pub average_response_time: f64,
    /// Unix epoch milliseconds
    pub last_active: i64,
    pub rating: f64,
}

impl AgentPerformance {
    pub fn fresh(now: i64) -> Self {
        Self {
            tasks_completed: 0,
            tasks_failed: 0,
            success_rate: 100.0,
            average_response_time: 0.0,
            last_active: now,
            rating: 5.0,
        }
    }

    pub fn attempts(&self) -> u64 {
        self.tasks_completed + self.tasks_failed
    }
}

/// A registered agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRecord {
    pub id: AgentId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AgentKind,
    pub description: String,
    pub capabilities: Vec<String>,
    pub status: AgentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_task: Option<String>,
    pub performance: AgentPerformance,
    /// Tool names this agent may invoke (owned by the tool registry)
    pub tools: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<AiModel>,
}

impl AgentRecord {
    pub fn has_capability(&self, capability: &str) -> bool {
        self.capabilities.iter().any(|c| c == capability)
    }

    /// True if the agent shares at least one capability with `required`
    pub fn matches_any(&self, required: &[String]) -> bool {
        required.iter().any(|c| self.has_capability(c))
    }
}

/// Optional fields applied on top of the defaults of an ad hoc agent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentOverrides {
    pub name: Option<String>,
    pub description: Option<String>,
    pub capabilities: Option<Vec<String>>,
    pub tools: Option<Vec<String>>,
    pub model: Option<AiModel>,
}

/// Extra constraints for agent selection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskRequirements {
    /// Candidate agents must share at least one of these
    pub capabilities: Vec<String>,
}

/// A unit of work handed to an agent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskRequest {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub task_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Any other task fields, passed through to the step input untouched
    #[serde(flatten)]
    pub details: serde_json::Map<String, Value>,
}

impl TaskRequest {
    pub fn of_type(task_type: impl Into<String>) -> Self {
        Self {
            task_type: Some(task_type.into()),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Text shown as the agent's current task
    pub fn summary(&self) -> String {
        non_empty(&self.description)
            .or(non_empty(&self.task_type))
            .unwrap_or("Executing task")
            .to_string()
    }

    pub fn type_label(&self) -> &str {
        non_empty(&self.task_type).unwrap_or("generic")
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

// ========== Tools ==========

/// Origin of a tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolKind {
    #[default]
    Static,
    Dynamic,
    Evolved,
    UserGenerated,
}

/// Primitive type of a tool parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    String,
    Number,
    Boolean,
    Array,
    Object,
}

/// Declared parameter of a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: ParameterType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
}

/// Usage statistics of a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolPerformance {
    pub usage_count: u64,
    /// Percentage in [0, 100]
    pub success_rate: f64,
    /// Milliseconds, two-point blended
    pub average_execution_time: f64,
    /// Unix epoch milliseconds
    pub last_used: i64,
    pub rating: f64,
}

impl ToolPerformance {
    pub fn fresh(now: i64) -> Self {
        Self {
            usage_count: 0,
            success_rate: 100.0,
            average_execution_time: 0.0,
            last_used: now,
            rating: 5.0,
        }
    }
}

fn default_category() -> String {
    "general".to_string()
}

/// Everything needed to register a tool; the registry assigns id and performance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub kind: ToolKind,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub is_custom: bool,
    #[serde(default)]
    pub is_dynamic: bool,
    #[serde(default)]
    pub parameters: Vec<ToolParameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

/// A registered tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolRecord {
    pub id: ToolId,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: ToolKind,
    pub category: String,
    pub is_custom: bool,
    pub is_dynamic: bool,
    pub parameters: Vec<ToolParameter>,
    pub performance: ToolPerformance,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

impl ToolRecord {
    pub fn from_spec(id: ToolId, spec: ToolSpec, now: i64) -> Self {
        Self {
            id,
            name: spec.name,
            description: spec.description,
            kind: spec.kind,
            category: spec.category,
            is_custom: spec.is_custom,
            is_dynamic: spec.is_dynamic,
            parameters: spec.parameters,
            performance: ToolPerformance::fresh(now),
            created_by: spec.created_by,
        }
    }
}

/// Observed result of one tool use
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageOutcome {
    pub success: Option<bool>,
    /// Milliseconds
    pub execution_time: Option<f64>,
}

// ========== Workflows ==========

/// Status of a workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

/// Status of a single workflow step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Waiting,
    Running,
    Completed,
    Failed,
    Skipped,
}

impl StepStatus {
    /// Check if the step has finished (completed, failed or skipped)
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StepStatus::Completed | StepStatus::Failed | StepStatus::Skipped
        )
    }
}

/// Caller-supplied description of a step; the engine assigns the id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepSpec {
    pub name: String,
    pub agent_id: AgentId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_id: Option<ToolId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StepStatus>,
    #[serde(default)]
    pub input: Value,
    /// Ids (`step-{index}`) of earlier steps that must complete first
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl StepSpec {
    pub fn new(name: impl Into<String>, agent_id: impl Into<AgentId>) -> Self {
        Self {
            name: name.into(),
            agent_id: agent_id.into(),
            tool_id: None,
            status: None,
            input: Value::Null,
            dependencies: Vec::new(),
        }
    }

    pub fn with_input(mut self, input: Value) -> Self {
        self.input = input;
        self
    }

    pub fn with_tool(mut self, tool_id: impl Into<ToolId>) -> Self {
        self.tool_id = Some(tool_id.into());
        self
    }

    pub fn depends_on(mut self, step_id: impl Into<String>) -> Self {
        self.dependencies.push(step_id.into());
        self
    }
}

/// One step of a workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowStep {
    pub id: String,
    pub name: String,
    pub agent_id: AgentId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_id: Option<ToolId>,
    pub status: StepStatus,
    pub input: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
    pub dependencies: Vec<String>,
}

impl WorkflowStep {
    pub fn from_spec(index: usize, spec: StepSpec) -> Self {
        Self {
            id: step_id(index),
            name: spec.name,
            agent_id: spec.agent_id,
            tool_id: spec.tool_id,
            status: spec.status.unwrap_or(StepStatus::Waiting),
            input: spec.input,
            output: None,
            error: None,
            started_at: None,
            completed_at: None,
            dependencies: spec.dependencies,
        }
    }
}

/// Id of the step at `index`
pub fn step_id(index: usize) -> String {
    format!("step-{}", index)
}

/// An ordered sequence of steps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    pub id: WorkflowId,
    pub name: String,
    pub description: String,
    pub steps: Vec<WorkflowStep>,
    pub status: WorkflowStatus,
    /// Percentage in [0, 100]
    pub progress: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Workflow {
    pub fn step(&self, step_id: &str) -> Option<&WorkflowStep> {
        self.steps.iter().find(|s| s.id == step_id)
    }

    /// Recompute progress from the share of steps that reached a terminal status
    pub fn refresh_progress(&mut self) {
        if self.steps.is_empty() {
            return;
        }
        let done = self.steps.iter().filter(|s| s.status.is_terminal()).count();
        self.progress = ((done * 100) / self.steps.len()) as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_agent_kind_round_trips_through_str() {
        for kind in AgentKind::ALL {
            assert_eq!(kind.as_str().parse::<AgentKind>(), Ok(kind));
        }
        assert!("wizardry".parse::<AgentKind>().is_err());
    }

    #[test]
    fn test_availability() {
        assert!(AgentStatus::Idle.is_available());
        assert!(AgentStatus::Busy.is_available());
        assert!(!AgentStatus::Offline.is_available());
        assert!(!AgentStatus::Error.is_available());
    }

    #[test]
    fn test_task_summary_fallbacks() {
        let described = TaskRequest::of_type("routing").with_description("Add /about page");
        assert_eq!(described.summary(), "Add /about page");
        assert_eq!(TaskRequest::of_type("routing").summary(), "routing");
        assert_eq!(TaskRequest::default().summary(), "Executing task");
    }

    #[test]
    fn test_empty_task_fields_fall_through() {
        let blank = TaskRequest::of_type("routing").with_description("");
        assert_eq!(blank.summary(), "routing");

        let empty = TaskRequest::of_type("").with_description("");
        assert_eq!(empty.summary(), "Executing task");
        assert_eq!(empty.type_label(), "generic");
    }

    #[test]
    fn test_task_request_keeps_extra_fields() {
        let task: TaskRequest = serde_json::from_value(serde_json::json!({
            "type": "component-creation",
            "component": "Navbar"
        }))
        .unwrap();
        assert_eq!(task.type_label(), "component-creation");
        assert_eq!(task.details.get("component"), Some(&serde_json::json!("Navbar")));

        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"type": "component-creation", "component": "Navbar"})
        );
    }

    #[test]
    fn test_tool_spec_defaults() {
        let spec: ToolSpec = serde_json::from_str(r#"{"name": "lint"}"#).unwrap();
        assert_eq!(spec.kind, ToolKind::Static);
        assert_eq!(spec.category, "general");
        assert!(spec.parameters.is_empty());
        assert!(!spec.is_dynamic);
    }

    #[test]
    fn test_step_defaults_to_waiting() {
        let step = WorkflowStep::from_spec(3, StepSpec::new("Build", "builder"));
        assert_eq!(step.id, "step-3");
        assert_eq!(step.status, StepStatus::Waiting);
    }

    #[test]
    fn test_ids_compare_with_str() {
        let id = AgentId::from("nextjs-developer");
        assert_eq!(id, "nextjs-developer");
        assert_eq!(id.to_string(), "nextjs-developer");
    }
}
