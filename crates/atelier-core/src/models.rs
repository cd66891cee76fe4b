//! Model capability registry
//!
//! Static reference data for the language models the router can choose from.
//! The table is fixed at compile time and never mutated.

use crate::error::{AtelierError, Result};
use serde::{Deserialize, Serialize};

/// Language model identifiers known to the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AiModel {
    /// Code generation and software development
    #[serde(rename = "qwen3-coder-plus")]
    Qwen3CoderPlus,
    /// Vision and multimodal understanding
    #[serde(rename = "qwen3-vl-plus")]
    Qwen3VlPlus,
    /// Long context planning and architecture
    #[serde(rename = "kimi-k2-0905")]
    KimiK2,
    /// Natural language and user interaction
    #[serde(rename = "glm-4.6")]
    Glm46,
    /// Reasoning and problem solving
    #[serde(rename = "deepseek-v3.2")]
    DeepseekV32,
}

impl AiModel {
    /// The model used whenever no routing rule matches
    pub const DEFAULT: AiModel = AiModel::Glm46;

    /// All models in declaration order
    pub const ALL: [AiModel; 5] = [
        AiModel::Qwen3CoderPlus,
        AiModel::Qwen3VlPlus,
        AiModel::KimiK2,
        AiModel::Glm46,
        AiModel::DeepseekV32,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AiModel::Qwen3CoderPlus => "qwen3-coder-plus",
            AiModel::Qwen3VlPlus => "qwen3-vl-plus",
            AiModel::KimiK2 => "kimi-k2-0905",
            AiModel::Glm46 => "glm-4.6",
            AiModel::DeepseekV32 => "deepseek-v3.2",
        }
    }

    /// Declared capabilities of this model
    pub fn capabilities(&self) -> &'static ModelCapability {
        capabilities(*self)
    }
}

impl std::fmt::Display for AiModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AiModel {
    type Err = AtelierError;

    fn from_str(s: &str) -> Result<Self> {
        AiModel::ALL
            .into_iter()
            .find(|model| model.as_str() == s)
            .ok_or_else(|| AtelierError::unknown_model(s))
    }
}

/// Relative response speed class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speed {
    Fast,
    Medium,
    Slow,
}

/// Input modality a model accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Text,
    Vision,
    Code,
}

/// Declared metadata for one model
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelCapability {
    pub model: AiModel,
    pub name: &'static str,
    pub description: &'static str,
    pub strengths: &'static [&'static str],
    pub use_cases: &'static [&'static str],
    /// Context window size in tokens
    pub context_window: u32,
    pub speed: Speed,
    pub modalities: &'static [Modality],
}

impl ModelCapability {
    pub fn supports(&self, modality: Modality) -> bool {
        self.modalities.contains(&modality)
    }
}

static MODEL_CAPABILITIES: [ModelCapability; 5] = [
    ModelCapability {
        model: AiModel::Qwen3CoderPlus,
        name: "Qwen3 Coder Plus",
        description: "Advanced code generation and software development",
        strengths: &[
            "Code completion and generation",
            "Multi-language programming support",
            "Code refactoring and optimization",
            "API integration and documentation",
        ],
        use_cases: &[
            "React/Next.js component generation",
            "Backend API development",
            "Database schema design",
            "Code review and optimization",
        ],
        context_window: 32_000,
        speed: Speed::Fast,
        modalities: &[Modality::Text, Modality::Code],
    },
    ModelCapability {
        model: AiModel::Qwen3VlPlus,
        name: "Qwen3 Vision Plus",
        description: "Vision and multimodal understanding",
        strengths: &[
            "Image-to-code conversion",
            "UI/UX design analysis",
            "Visual component recognition",
            "Mockup interpretation",
        ],
        use_cases: &[
            "Converting design mockups to code",
            "Analyzing uploaded UI screenshots",
            "Visual debugging and layout optimization",
            "Design system component extraction",
        ],
        context_window: 8_000,
        speed: Speed::Medium,
        modalities: &[Modality::Text, Modality::Vision, Modality::Code],
    },
    ModelCapability {
        model: AiModel::KimiK2,
        name: "Kimi K2",
        description: "Long context planning and architecture",
        strengths: &[
            "Extended context understanding",
            "System architecture design",
            "Complex project planning",
            "Multi-file coordination",
        ],
        use_cases: &[
            "Project architecture planning",
            "Multi-component system design",
            "Long-term project evolution",
            "Complex workflow orchestration",
        ],
        context_window: 200_000,
        speed: Speed::Medium,
        modalities: &[Modality::Text, Modality::Code],
    },
    ModelCapability {
        model: AiModel::Glm46,
        name: "GLM 4.6",
        description: "Natural language and user interaction",
        strengths: &[
            "Natural conversation flow",
            "Requirement gathering",
            "User intent understanding",
            "Content generation",
        ],
        use_cases: &[
            "Initial user conversation and requirement gathering",
            "Prompt enhancement and optimization",
            "Documentation generation",
            "User experience optimization",
        ],
        context_window: 16_000,
        speed: Speed::Fast,
        modalities: &[Modality::Text],
    },
    ModelCapability {
        model: AiModel::DeepseekV32,
        name: "DeepSeek V3.2",
        description: "Advanced reasoning and problem solving",
        strengths: &[
            "Complex problem decomposition",
            "Advanced debugging and error resolution",
            "Performance optimization",
            "Security analysis",
        ],
        use_cases: &[
            "Complex bug diagnosis",
            "Performance bottleneck analysis",
            "Security vulnerability assessment",
            "Advanced algorithm implementation",
        ],
        context_window: 64_000,
        speed: Speed::Slow,
        modalities: &[Modality::Text, Modality::Code],
    },
];

/// Get the declared capabilities of a model
pub fn capabilities(model: AiModel) -> &'static ModelCapability {
    match model {
        AiModel::Qwen3CoderPlus => &MODEL_CAPABILITIES[0],
        AiModel::Qwen3VlPlus => &MODEL_CAPABILITIES[1],
        AiModel::KimiK2 => &MODEL_CAPABILITIES[2],
        AiModel::Glm46 => &MODEL_CAPABILITIES[3],
        AiModel::DeepseekV32 => &MODEL_CAPABILITIES[4],
    }
}

/// Look up capabilities by identifier string
///
/// Fails with [`AtelierError::UnknownModel`] for identifiers outside the fixed set.
pub fn capabilities_for(identifier: &str) -> Result<&'static ModelCapability> {
    identifier.parse::<AiModel>().map(capabilities)
}

/// All model capabilities in declaration order
pub fn list_models() -> &'static [ModelCapability] {
    &MODEL_CAPABILITIES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_matches_enum_order() {
        let listed: Vec<AiModel> = list_models().iter().map(|c| c.model).collect();
        assert_eq!(listed, AiModel::ALL.to_vec());
        for model in AiModel::ALL {
            assert_eq!(capabilities(model).model, model);
        }
    }

    #[test]
    fn test_capabilities_for_known_identifier() {
        let cap = capabilities_for("kimi-k2-0905").unwrap();
        assert_eq!(cap.context_window, 200_000);
        assert_eq!(cap.speed, Speed::Medium);
    }

    #[test]
    fn test_capabilities_for_unknown_identifier() {
        let err = capabilities_for("gpt-4o").unwrap_err();
        assert!(matches!(err, AtelierError::UnknownModel(ref id) if id == "gpt-4o"));
    }

    #[test]
    fn test_only_vision_model_supports_vision() {
        let vision: Vec<AiModel> = list_models()
            .iter()
            .filter(|c| c.supports(Modality::Vision))
            .map(|c| c.model)
            .collect();
        assert_eq!(vision, vec![AiModel::Qwen3VlPlus]);
    }

    #[test]
    fn test_serde_identifiers() {
        let json = serde_json::to_string(&AiModel::DeepseekV32).unwrap();
        assert_eq!(json, "\"deepseek-v3.2\"");
        let parsed: AiModel = serde_json::from_str("\"glm-4.6\"").unwrap();
        assert_eq!(parsed, AiModel::Glm46);
    }
}
