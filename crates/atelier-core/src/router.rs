//! Model router
//!
//! Maps a task category, an agent type, or a context-size hint to a model.
//! Every selection is total: unmatched inputs fall back to [`AiModel::DEFAULT`].

use crate::models::AiModel;

/// Pick a model for a task category
pub fn select_model_for_task(category: &str) -> AiModel {
    match category {
        "conversation" | "requirements" | "prompt-enhancement" => AiModel::Glm46,
        "vision" | "image-analysis" | "design-conversion" => AiModel::Qwen3VlPlus,
        "code-generation" | "component-creation" | "api-development" => AiModel::Qwen3CoderPlus,
        "architecture" | "planning" | "complex-design" => AiModel::KimiK2,
        "debugging" | "optimization" | "security" | "problem-solving" => AiModel::DeepseekV32,
        _ => AiModel::DEFAULT,
    }
}

/// Pick a model for an agent type key (e.g. `nextjs-developer`)
pub fn select_model_for_agent_type(agent_type: &str) -> AiModel {
    match agent_type {
        "agent-organizer" | "context-manager" => AiModel::KimiK2,
        "performance-monitor" | "error-coordinator" => AiModel::DeepseekV32,
        "nextjs-developer" | "react-specialist" | "backend-architect" => AiModel::Qwen3CoderPlus,
        "ui-designer" => AiModel::Qwen3VlPlus,
        "requirement-analyst" | "user-researcher" => AiModel::Glm46,
        _ => AiModel::DEFAULT,
    }
}

/// Pick a model able to hold `tokens` of context
///
/// Thresholds are exclusive and checked from the largest down.
pub fn select_model_for_context_size(tokens: u64) -> AiModel {
    if tokens > 100_000 {
        AiModel::KimiK2
    } else if tokens > 50_000 {
        AiModel::DeepseekV32
    } else if tokens > 20_000 {
        AiModel::Qwen3CoderPlus
    } else {
        AiModel::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_categories() {
        assert_eq!(select_model_for_task("requirements"), AiModel::Glm46);
        assert_eq!(select_model_for_task("design-conversion"), AiModel::Qwen3VlPlus);
        assert_eq!(select_model_for_task("component-creation"), AiModel::Qwen3CoderPlus);
        assert_eq!(select_model_for_task("planning"), AiModel::KimiK2);
        assert_eq!(select_model_for_task("security"), AiModel::DeepseekV32);
    }

    #[test]
    fn test_unknown_task_falls_back() {
        for category in ["", "poetry", "Code-Generation", "deploy"] {
            assert_eq!(select_model_for_task(category), AiModel::DEFAULT);
        }
    }

    #[test]
    fn test_agent_types() {
        assert_eq!(select_model_for_agent_type("ui-designer"), AiModel::Qwen3VlPlus);
        assert_eq!(select_model_for_agent_type("context-manager"), AiModel::KimiK2);
        assert_eq!(select_model_for_agent_type("development"), AiModel::DEFAULT);
    }

    #[test]
    fn test_context_thresholds_are_exclusive() {
        assert_eq!(select_model_for_context_size(100_001), AiModel::KimiK2);
        assert_eq!(select_model_for_context_size(100_000), AiModel::DeepseekV32);
        assert_eq!(select_model_for_context_size(50_000), AiModel::Qwen3CoderPlus);
        assert_eq!(select_model_for_context_size(20_001), AiModel::Qwen3CoderPlus);
        assert_eq!(select_model_for_context_size(20_000), AiModel::Glm46);
        assert_eq!(select_model_for_context_size(0), AiModel::Glm46);
    }
}
