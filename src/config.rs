// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration file support for simgrep
//!
//! Loads configuration from .simgreprc.toml in current directory or ~/.config/simgrep/config.toml

use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_SIMILARITY_COMMAND: &str = "w2vgrep";
pub const DEFAULT_PATTERN_COMMAND: &str = "rg";
pub const DEFAULT_THRESHOLD: f64 = 0.7;
pub const DEFAULT_CONTEXT: usize = 2;

/// Output format for results (mirrored from cli for library use)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigOutputFormat {
    #[default]
    Text,
    Json,
}

/// External tool settings, handed to the runner as a plain value
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Similarity search binary (name on PATH or absolute path)
    pub similarity_command: String,
    /// Line search binary (ripgrep)
    pub pattern_command: String,
    /// Word-embedding model file passed to the similarity tool
    pub model_path: Option<PathBuf>,
    /// Minimum similarity score to report
    pub threshold: f64,
    /// Lines of context before and after each hit
    pub context: usize,
    /// Glob applied to recursive searches and location lookups
    pub glob: Option<String>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            similarity_command: DEFAULT_SIMILARITY_COMMAND.to_string(),
            pattern_command: DEFAULT_PATTERN_COMMAND.to_string(),
            model_path: None,
            threshold: DEFAULT_THRESHOLD,
            context: DEFAULT_CONTEXT,
            glob: None,
        }
    }
}

/// Configuration loaded from .simgreprc.toml or ~/.config/simgrep/config.toml
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum number of matches to return
    pub max_results: Option<usize>,
    /// Default output format (text or json)
    pub default_format: Option<String>,
    pub tools: ToolConfig,
}

impl Config {
    /// Load configuration from files
    ///
    /// Precedence (highest to lowest):
    /// 1. .simgreprc.toml in current directory
    /// 2. ~/.config/simgrep/config.toml
    pub fn load() -> Self {
        if let Some(config) = Self::load_from_path(Path::new(".simgreprc.toml")) {
            return config;
        }

        if let Some(home) = dirs::home_dir() {
            let config_path = home.join(".config").join("simgrep").join("config.toml");
            if let Some(config) = Self::load_from_path(&config_path) {
                return config;
            }
        }

        Self::default()
    }

    fn load_from_path(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        match Self::parse(&content) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "loaded config");
                Some(config)
            }
            Err(e) => {
                tracing::warn!("Failed to parse {}: {}", path.display(), e);
                None
            }
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Get output format from config, parsing the string to ConfigOutputFormat
    pub fn output_format(&self) -> Option<ConfigOutputFormat> {
        self.default_format
            .as_ref()
            .and_then(|s| match s.to_lowercase().as_str() {
                "json" => Some(ConfigOutputFormat::Json),
                "text" => Some(ConfigOutputFormat::Text),
                _ => None,
            })
    }

    /// Merge CLI options with config (CLI wins)
    pub fn merge_max_results(&self, cli_value: Option<usize>) -> Option<usize> {
        cli_value.or(self.max_results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::parse("").expect("parse");
        assert_eq!(config.tools, ToolConfig::default());
        assert_eq!(config.tools.similarity_command, "w2vgrep");
        assert_eq!(config.tools.pattern_command, "rg");
        assert_eq!(config.output_format(), None);
    }

    #[test]
    fn tools_section_overrides_fields() {
        let config = Config::parse(
            "default_format = \"JSON\"\nmax_results = 5\n\n[tools]\nsimilarity_command = \"/opt/w2vgrep\"\nmodel_path = \"/models/en.bin\"\nthreshold = 0.55\n",
        )
        .expect("parse");
        assert_eq!(config.output_format(), Some(ConfigOutputFormat::Json));
        assert_eq!(config.tools.similarity_command, "/opt/w2vgrep");
        assert_eq!(config.tools.model_path, Some(PathBuf::from("/models/en.bin")));
        assert_eq!(config.tools.threshold, 0.55);
        assert_eq!(config.tools.context, DEFAULT_CONTEXT);
        assert_eq!(config.merge_max_results(None), Some(5));
        assert_eq!(config.merge_max_results(Some(2)), Some(2));
    }

    #[test]
    fn malformed_config_is_an_error() {
        assert!(Config::parse("[tools]\nthreshold = \"high\"").is_err());
    }
}
