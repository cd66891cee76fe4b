//! Configuration types for Atelier
//!
//! Defines the structure of `.atelier.toml` configuration.

use crate::orchestration::{AgentTemplate, ToolSpec};
use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AtelierConfig {
    /// Orchestrator behaviour
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Static tools registered by `initialize`
    #[serde(default)]
    pub tools: Vec<ToolSpec>,
}

/// Orchestrator configuration section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Delay of the simulated step runner in milliseconds
    #[serde(default = "default_step_delay_ms")]
    pub step_delay_ms: u64,

    /// Templates instantiated by `initialize`
    #[serde(default = "default_starter_agents")]
    pub starter_agents: Vec<AgentTemplate>,

    /// Capacity of the event channel
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

fn default_step_delay_ms() -> u64 {
    1000
}

fn default_starter_agents() -> Vec<AgentTemplate> {
    AgentTemplate::STARTER.to_vec()
}

fn default_event_capacity() -> usize {
    1000
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            step_delay_ms: default_step_delay_ms(),
            starter_agents: default_starter_agents(),
            event_capacity: default_event_capacity(),
        }
    }
}

/// Server configuration section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (supports ${ENV_VAR} syntax)
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl AtelierConfig {
    /// Default configuration with the simulated runner delay removed
    pub fn instant() -> Self {
        let mut config = Self::default();
        config.orchestrator.step_delay_ms = 0;
        config
    }
}
