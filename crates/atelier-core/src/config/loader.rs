//! Configuration loader with environment variable expansion
//!
//! Loads configuration from `.atelier.toml` in project root or user config directory.

use super::types::AtelierConfig;
use regex::Regex;
use std::path::{Path, PathBuf};

/// Configuration loading error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid expansion pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid value for {name}: {value}")]
    InvalidOverride { name: String, value: String },
}

/// Load configuration from various sources
///
/// Priority order:
/// 1. Project-level `.atelier.toml`
/// 2. User-level `~/.config/atelier/config.toml`
/// 3. Default configuration
pub fn load_config(project_dir: &Path) -> Result<AtelierConfig, ConfigError> {
    let project_config = project_dir.join(".atelier.toml");
    if project_config.exists() {
        return load_from_file(&project_config);
    }

    if let Some(user_config) = user_config_path() {
        if user_config.exists() {
            return load_from_file(&user_config);
        }
    }

    apply_env_overrides(AtelierConfig::default())
}

/// Get user config file path
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("atelier").join("config.toml"))
}

/// Load configuration from a specific file
pub fn load_from_file(path: &Path) -> Result<AtelierConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), "loading configuration");
    parse_config(&content)
}

/// Parse configuration text, then expand and apply overrides
pub fn parse_config(content: &str) -> Result<AtelierConfig, ConfigError> {
    let mut config: AtelierConfig = toml::from_str(content)?;
    expand_env_vars(&mut config)?;
    apply_env_overrides(config)
}

/// Expand ${VAR} patterns in string values
fn expand_env_vars(config: &mut AtelierConfig) -> Result<(), ConfigError> {
    let env_regex = Regex::new(r"\$\{([^}]+)\}")?;

    config.server.host = expand_string(&config.server.host, &env_regex);

    for tool in &mut config.tools {
        tool.name = expand_string(&tool.name, &env_regex);
        tool.description = expand_string(&tool.description, &env_regex);
        if let Some(ref created_by) = tool.created_by {
            tool.created_by = Some(expand_string(created_by, &env_regex));
        }
    }

    Ok(())
}

/// Expand environment variables in a single string
///
/// Unset variables are left as written.
fn expand_string(s: &str, regex: &Regex) -> String {
    regex
        .replace_all(s, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
}

/// Apply environment variable overrides for common settings
///
/// Supports:
/// - ATELIER_STEP_DELAY_MS -> orchestrator.step_delay_ms
/// - ATELIER_HOST -> server.host
/// - ATELIER_PORT -> server.port
fn apply_env_overrides(mut config: AtelierConfig) -> Result<AtelierConfig, ConfigError> {
    if let Some(delay) = env_value("ATELIER_STEP_DELAY_MS") {
        config.orchestrator.step_delay_ms = parse_override("ATELIER_STEP_DELAY_MS", &delay)?;
    }

    if let Some(host) = env_value("ATELIER_HOST") {
        config.server.host = host;
    }

    if let Some(port) = env_value("ATELIER_PORT") {
        config.server.port = parse_override("ATELIER_PORT", &port)?;
    }

    Ok(config)
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn parse_override<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidOverride {
        name: name.to_string(),
        value: value.to_string(),
    })
}

/// Create a sample configuration file content
pub fn sample_config() -> &'static str {
    r#"# Atelier Configuration
# Place this file in your project root as .atelier.toml
# or in ~/.config/atelier/config.toml for global settings

[orchestrator]
# Delay of the simulated step runner in milliseconds
step_delay_ms = 1000

# Agents created on initialize
starter_agents = [
    "agent-organizer",
    "context-manager",
    "nextjs-developer",
    "react-specialist",
    "ui-designer",
    "requirement-analyst",
]

# Pending events kept for subscribers before new ones are dropped
event_capacity = 1000

[server]
host = "0.0.0.0"
port = 8080

# Static tools registered on initialize
[[tools]]
name = "eslint"
description = "Lint TypeScript and JavaScript sources"
category = "quality"
created_by = "${USER}"

[[tools.parameters]]
name = "path"
type = "string"
required = true
description = "Directory to lint"
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestration::{AgentTemplate, ParameterType, ToolKind};
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AtelierConfig::default();
        assert_eq!(config.orchestrator.step_delay_ms, 1000);
        assert_eq!(config.orchestrator.starter_agents, AgentTemplate::STARTER.to_vec());
        assert_eq!(config.server.bind_addr(), "0.0.0.0:8080");
        assert!(config.tools.is_empty());
    }

    #[test]
    fn test_sample_config_parses() {
        let config: AtelierConfig = toml::from_str(sample_config()).unwrap();
        assert_eq!(config.orchestrator.starter_agents.len(), 6);
        assert_eq!(config.tools.len(), 1);

        let tool = &config.tools[0];
        assert_eq!(tool.kind, ToolKind::Static);
        assert_eq!(tool.parameters[0].param_type, ParameterType::String);
        assert!(tool.parameters[0].required);
    }

    #[test]
    fn test_partial_sections_use_defaults() {
        let config: AtelierConfig = toml::from_str("[server]\nport = 9000\n").unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.orchestrator.event_capacity, 1000);
    }

    #[test]
    fn test_unknown_starter_is_rejected() {
        let result = parse_config("[orchestrator]\nstarter_agents = [\"wizard\"]\n");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_from_project_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join(".atelier.toml")).unwrap();
        writeln!(file, "[orchestrator]\nstep_delay_ms = 5\nstarter_agents = [\"ui-designer\"]").unwrap();

        let config = load_config(dir.path()).unwrap();
        assert_eq!(
            config.orchestrator.starter_agents,
            vec![AgentTemplate::UiDesigner]
        );
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_from_file(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::ReadError(_))));
    }

    #[test]
    fn test_expand_env_var() {
        let regex = Regex::new(r"\$\{([^}]+)\}").unwrap();
        std::env::set_var("ATELIER_TEST_VAR", "test_value");
        let result = expand_string("prefix_${ATELIER_TEST_VAR}_suffix", &regex);
        assert_eq!(result, "prefix_test_value_suffix");
        std::env::remove_var("ATELIER_TEST_VAR");
    }

    #[test]
    fn test_missing_env_var() {
        let regex = Regex::new(r"\$\{([^}]+)\}").unwrap();
        let result = expand_string("${ATELIER_NONEXISTENT_VAR}", &regex);
        assert_eq!(result, "${ATELIER_NONEXISTENT_VAR}");
    }

    #[test]
    fn test_expansion_in_tools() {
        std::env::set_var("ATELIER_TEST_OWNER", "platform-team");
        let config = parse_config(
            "[[tools]]\nname = \"deploy\"\ncreated_by = \"${ATELIER_TEST_OWNER}\"\n",
        )
        .unwrap();
        std::env::remove_var("ATELIER_TEST_OWNER");
        assert_eq!(config.tools[0].created_by.as_deref(), Some("platform-team"));
    }

    #[test]
    fn test_invalid_override() {
        let err = parse_override::<u16>("ATELIER_PORT", "eighty").unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for ATELIER_PORT: eighty");
        assert_eq!(parse_override::<u64>("ATELIER_STEP_DELAY_MS", " 250 ").unwrap(), 250);
    }
}
