//! Configuration module for Atelier
//!
//! Handles loading and parsing of `.atelier.toml` configuration files
//! with support for environment variable expansion.

mod loader;
mod types;

pub use loader::{
    load_config, load_from_file, parse_config, sample_config, user_config_path, ConfigError,
};
pub use types::{AtelierConfig, OrchestratorConfig, ServerConfig};
