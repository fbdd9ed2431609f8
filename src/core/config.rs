//! Configuration management for Roleflow.
//!
//! Handles loading configuration from TOML files.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Name of the project-local config file.
pub const LOCAL_CONFIG_FILE: &str = ".roleflow.toml";

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Classification settings
    pub analysis: AnalysisConfig,

    /// Output artifact settings
    pub output: OutputConfig,
}

/// Classification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Variable whose comparison against `present`/`absent` selects the state
    pub state_variable: String,

    /// Prefix marking role variables inside guard expressions
    pub variable_prefix: String,
}

/// Output artifact settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory both artifacts are written to
    pub directory: PathBuf,

    /// File name of the text report
    pub report_file: String,

    /// File name of the graph, without extension
    pub graph_file: String,

    /// Graphviz output format (svg, png, pdf, ...); `dot` writes the source only
    pub graph_format: String,

    /// Graphviz executable used to render the graph
    pub dot_command: String,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Looks for config in:
    /// 1. `.roleflow.toml` in current directory
    /// 2. `~/.config/roleflow/config.toml`
    /// 3. Falls back to defaults
    pub fn load() -> anyhow::Result<Self> {
        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Some(config_dir) = Self::config_dir() {
            let global_config = config_dir.join("config.toml");
            if global_config.exists() {
                return Self::load_from_file(&global_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Get the config directory path.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("roleflow"))
    }
}

impl OutputConfig {
    /// Full path of the text report.
    pub fn report_path(&self) -> PathBuf {
        self.directory.join(&self.report_file)
    }

    /// Graph path without the format extension.
    pub fn graph_stem(&self) -> PathBuf {
        self.directory.join(&self.graph_file)
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            state_variable: "influxdb_state".to_string(),
            variable_prefix: "influxdb_".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            report_file: "influxdb_role_analysis.txt".to_string(),
            graph_file: "influxdb_role_state_flow".to_string(),
            graph_format: "svg".to_string(),
            dot_command: "dot".to_string(),
        }
    }
}
