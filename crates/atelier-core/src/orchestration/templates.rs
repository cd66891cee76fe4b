//! Specialised agent templates
//!
//! Each template fixes name, description, category, capabilities, tool names
//! and bound model. The category is an explicit field of the definition.

use super::types::{AgentId, AgentKind, AgentPerformance, AgentRecord, AgentStatus};
use crate::models::AiModel;
use serde::{Deserialize, Serialize};

/// Closed set of agent templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgentTemplate {
    AgentOrganizer,
    ContextManager,
    PerformanceMonitor,
    ErrorCoordinator,
    NextjsDeveloper,
    ReactSpecialist,
    UiDesigner,
    MobileDeveloper,
    ApiArchitect,
    RequirementAnalyst,
}

/// Static definition behind a template
#[derive(Debug, Clone, Serialize)]
pub struct TemplateDefinition {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub kind: AgentKind,
    pub capabilities: &'static [&'static str],
    pub tools: &'static [&'static str],
    pub model: AiModel,
}

impl AgentTemplate {
    pub const ALL: [AgentTemplate; 10] = [
        AgentTemplate::AgentOrganizer,
        AgentTemplate::ContextManager,
        AgentTemplate::PerformanceMonitor,
        AgentTemplate::ErrorCoordinator,
        AgentTemplate::NextjsDeveloper,
        AgentTemplate::ReactSpecialist,
        AgentTemplate::UiDesigner,
        AgentTemplate::MobileDeveloper,
        AgentTemplate::ApiArchitect,
        AgentTemplate::RequirementAnalyst,
    ];

    /// Agents created by `initialize` when no starter set is configured
    pub const STARTER: [AgentTemplate; 6] = [
        AgentTemplate::AgentOrganizer,
        AgentTemplate::ContextManager,
        AgentTemplate::NextjsDeveloper,
        AgentTemplate::ReactSpecialist,
        AgentTemplate::UiDesigner,
        AgentTemplate::RequirementAnalyst,
    ];

    pub fn key(&self) -> &'static str {
        self.definition().key
    }

    pub fn definition(&self) -> TemplateDefinition {
        match self {
            AgentTemplate::AgentOrganizer => TemplateDefinition {
                key: "agent-organizer",
                name: "Agent Organizer",
                description: "Multi-agent coordinator and team assembly specialist",
                kind: AgentKind::MetaOrchestration,
                capabilities: &[
                    "task-decomposition",
                    "agent-selection",
                    "workflow-design",
                    "team-optimization",
                ],
                tools: &[
                    "context-query",
                    "agent-capability-mapping",
                    "workflow-orchestration",
                ],
                model: AiModel::KimiK2,
            },
            AgentTemplate::ContextManager => TemplateDefinition {
                key: "context-manager",
                name: "Context Manager",
                description: "Information storage, retrieval, and synchronization expert",
                kind: AgentKind::MetaOrchestration,
                capabilities: &[
                    "state-management",
                    "data-synchronization",
                    "context-optimization",
                    "retrieval",
                ],
                tools: &[
                    "database-query",
                    "state-sync",
                    "context-retrieval",
                    "data-lifecycle",
                ],
                model: AiModel::KimiK2,
            },
            AgentTemplate::PerformanceMonitor => TemplateDefinition {
                key: "performance-monitor",
                name: "Performance Monitor",
                description: "System-wide metrics collection and optimization specialist",
                kind: AgentKind::MetaOrchestration,
                capabilities: &[
                    "metrics-collection",
                    "anomaly-detection",
                    "performance-analysis",
                    "optimization",
                ],
                tools: &[
                    "metrics-aggregation",
                    "alert-management",
                    "bottleneck-analysis",
                ],
                model: AiModel::DeepseekV32,
            },
            AgentTemplate::ErrorCoordinator => TemplateDefinition {
                key: "error-coordinator",
                name: "Error Coordinator",
                description: "Distributed error handling and recovery specialist",
                kind: AgentKind::MetaOrchestration,
                capabilities: &[
                    "error-correlation",
                    "failure-recovery",
                    "cascade-prevention",
                    "system-resilience",
                ],
                tools: &[
                    "error-aggregation",
                    "circuit-breaker",
                    "recovery-orchestration",
                ],
                model: AiModel::DeepseekV32,
            },
            AgentTemplate::NextjsDeveloper => TemplateDefinition {
                key: "nextjs-developer",
                name: "Next.js Developer",
                description: "Next.js 14+ full-stack development specialist",
                kind: AgentKind::Development,
                capabilities: &[
                    "component-creation",
                    "api-development",
                    "routing",
                    "optimization",
                    "deployment",
                ],
                tools: &[
                    "code-generation",
                    "file-manipulation",
                    "build-optimization",
                ],
                model: AiModel::Qwen3CoderPlus,
            },
            AgentTemplate::ReactSpecialist => TemplateDefinition {
                key: "react-specialist",
                name: "React Specialist",
                description: "React 18+ modern patterns and state management expert",
                kind: AgentKind::Development,
                capabilities: &[
                    "component-architecture",
                    "state-management",
                    "hooks-optimization",
                    "performance",
                ],
                tools: &[
                    "component-generation",
                    "state-optimization",
                    "performance-analysis",
                ],
                model: AiModel::Qwen3CoderPlus,
            },
            AgentTemplate::UiDesigner => TemplateDefinition {
                key: "ui-designer",
                name: "UI Designer",
                description: "Modern UI/UX design and component creation specialist",
                kind: AgentKind::Development,
                capabilities: &[
                    "design-systems",
                    "component-design",
                    "accessibility",
                    "responsive-design",
                ],
                tools: &[
                    "design-generation",
                    "component-styling",
                    "accessibility-check",
                ],
                model: AiModel::Qwen3VlPlus,
            },
            AgentTemplate::MobileDeveloper => TemplateDefinition {
                key: "mobile-developer",
                name: "Mobile Developer",
                description: "Cross-platform mobile application specialist",
                kind: AgentKind::DomainSpecific,
                capabilities: &[
                    "mobile-ui",
                    "native-features",
                    "app-optimization",
                    "store-deployment",
                ],
                tools: &[
                    "mobile-generation",
                    "native-integration",
                    "performance-optimization",
                ],
                model: AiModel::Qwen3CoderPlus,
            },
            AgentTemplate::ApiArchitect => TemplateDefinition {
                key: "api-architect",
                name: "API Architect",
                description: "RESTful API and backend service design expert",
                kind: AgentKind::DomainSpecific,
                capabilities: &[
                    "api-design",
                    "database-integration",
                    "authentication",
                    "rate-limiting",
                ],
                tools: &["api-generation", "schema-validation", "auth-implementation"],
                model: AiModel::Qwen3CoderPlus,
            },
            AgentTemplate::RequirementAnalyst => TemplateDefinition {
                key: "requirement-analyst",
                name: "Requirement Analyst",
                description: "User requirement gathering and analysis specialist",
                kind: AgentKind::Development,
                capabilities: &[
                    "requirement-extraction",
                    "user-story-creation",
                    "scope-definition",
                ],
                tools: &[
                    "conversation-analysis",
                    "requirement-structuring",
                    "scope-validation",
                ],
                model: AiModel::Glm46,
            },
        }
    }

    /// Build an idle agent record from this template under `id`
    pub fn instantiate(&self, id: AgentId, now: i64) -> AgentRecord {
        let def = self.definition();
        AgentRecord {
            id,
            name: def.name.to_string(),
            kind: def.kind,
            description: def.description.to_string(),
            capabilities: def.capabilities.iter().map(|c| c.to_string()).collect(),
            status: AgentStatus::Idle,
            current_task: None,
            performance: AgentPerformance::fresh(now),
            tools: def.tools.iter().map(|t| t.to_string()).collect(),
            model: Some(def.model),
        }
    }
}

impl std::fmt::Display for AgentTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for AgentTemplate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgentTemplate::ALL
            .into_iter()
            .find(|t| t.key() == s)
            .ok_or_else(|| format!("Unknown agent template: {}", s))
    }
}
