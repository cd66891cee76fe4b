//! Error types for Atelier Core
//!
//! Provides a unified error type for all orchestration operations.

use crate::config::ConfigError;
use thiserror::Error;

/// Result type for Atelier Core operations
pub type Result<T> = std::result::Result<T, AtelierError>;

/// Unified error type for Atelier Core
#[derive(Error, Debug)]
pub enum AtelierError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Agent id is not registered
    #[error("Agent {0} not found")]
    AgentNotFound(String),

    /// Workflow id is not registered
    #[error("Workflow {0} not found")]
    WorkflowNotFound(String),

    /// Model identifier outside the fixed model set
    #[error("Unknown model: {0}")]
    UnknownModel(String),

    /// A step runner failed in a way the engine cannot record as a step outcome
    #[error("Step failed: {0}")]
    StepFailed(String),

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

impl AtelierError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        AtelierError::Config(msg.into())
    }

    /// Create an agent-not-found error
    pub fn agent_not_found(id: impl Into<String>) -> Self {
        AtelierError::AgentNotFound(id.into())
    }

    /// Create a workflow-not-found error
    pub fn workflow_not_found(id: impl Into<String>) -> Self {
        AtelierError::WorkflowNotFound(id.into())
    }

    /// Create an unknown-model error
    pub fn unknown_model(id: impl Into<String>) -> Self {
        AtelierError::UnknownModel(id.into())
    }

    /// Create a step failure
    pub fn step_failed(msg: impl Into<String>) -> Self {
        AtelierError::StepFailed(msg.into())
    }

    /// Create an invalid operation error
    pub fn invalid_operation(msg: impl Into<String>) -> Self {
        AtelierError::InvalidOperation(msg.into())
    }

    /// Whether this error means the addressed record does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AtelierError::AgentNotFound(_)
                | AtelierError::WorkflowNotFound(_)
                | AtelierError::UnknownModel(_)
        )
    }
}

impl From<serde_json::Error> for AtelierError {
    fn from(err: serde_json::Error) -> Self {
        AtelierError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for AtelierError {
    fn from(err: toml::de::Error) -> Self {
        AtelierError::Config(err.to_string())
    }
}

impl From<ConfigError> for AtelierError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::ReadError(io) => AtelierError::Io(io),
            other => AtelierError::Config(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_messages() {
        assert_eq!(
            AtelierError::agent_not_found("ghost").to_string(),
            "Agent ghost not found"
        );
        assert_eq!(
            AtelierError::workflow_not_found("workflow-9").to_string(),
            "Workflow workflow-9 not found"
        );
    }

    #[test]
    fn test_is_not_found() {
        assert!(AtelierError::agent_not_found("a").is_not_found());
        assert!(AtelierError::unknown_model("gpt-9").is_not_found());
        assert!(!AtelierError::invalid_operation("x").is_not_found());
    }
}
