//! Configuration management

use crate::error::{ContainerizerError, ContainerizerResult, ErrorContext};
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Directory names whose whole subtree is skipped by every walk
pub const DEFAULT_IGNORED_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    ".next",
    ".cache",
    "venv",
    ".venv",
    "__pycache__",
    "dist",
    "build",
];

/// Extensions counted by the tech-stack aggregator
pub const DEFAULT_TECH_STACK_EXTENSIONS: &[&str] = &[
    ".py", ".js", ".ts", ".json", ".java", ".c", ".cpp", ".cs", ".go", ".rb", ".php", ".rs", ".sh",
    ".html", ".css",
];

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerizerConfig {
    pub llm: LlmConfig,
    pub analysis: AnalysisConfig,
    pub acquisition: AcquisitionConfig,
    pub pipeline: PipelineConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider type (openai, together, anthropic, groq, ollama)
    pub provider: String,
    pub model: String,
    /// API key (optional, falls back to the provider's environment variable)
    pub api_key: Option<String>,
    /// Base URL for custom or OpenAI-compatible providers
    pub base_url: Option<String>,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "together".to_string(),
            model: "moonshotai/Kimi-K2-Instruct".to_string(),
            api_key: None,
            base_url: None,
            temperature: 0.7,
            max_tokens: Some(4000),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub ignored_dirs: Vec<String>,
    pub tech_stack_extensions: Vec<String>,
    /// Upper bound on files read at the same time during one walk
    pub max_concurrent_reads: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            ignored_dirs: DEFAULT_IGNORED_DIRS.iter().map(|s| s.to_string()).collect(),
            tech_stack_extensions: DEFAULT_TECH_STACK_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_concurrent_reads: 16,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionConfig {
    /// Directory that receives one `repo_<id>` folder per clone
    pub clone_dir: String,
    /// Clone depth (None = full clone, Some(1) = shallow)
    pub clone_depth: Option<u32>,
    /// Token injected into HTTPS clone URLs for private repositories
    pub access_token: Option<String>,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            clone_dir: "cloned_repos".to_string(),
            clone_depth: Some(1),
            access_token: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Timeout around the external text-generation call
    pub generation_timeout_secs: u64,
    /// Whether artifacts are written into the analyzed tree
    pub write_artifacts: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            generation_timeout_secs: 300,
            write_artifacts: true,
        }
    }
}

impl ContainerizerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> ContainerizerResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ContainerizerError::Config {
            message: format!("Failed to read config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("read_file")
                .with_suggestion("Check if the config file exists and is readable"),
        })?;

        let config: ContainerizerConfig =
            toml::from_str(&content).map_err(|e| ContainerizerError::Config {
                message: format!("Failed to parse config: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("config")
                    .with_operation("parse_toml")
                    .with_suggestion("Check TOML syntax in config file"),
            })?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> ContainerizerResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ContainerizerError::Config {
            message: format!("Failed to serialize config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config").with_operation("serialize_toml"),
        })?;

        std::fs::write(path, content).map_err(|e| ContainerizerError::Config {
            message: format!("Failed to write config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("write_file")
                .with_suggestion("Check if the directory exists and is writable"),
        })?;

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> ContainerizerResult<()> {
        if self.analysis.max_concurrent_reads == 0 {
            return Err(Box::new(crate::config_error!(
                "analysis.max_concurrent_reads must be greater than 0",
                "config"
            )));
        }

        if let Some(bad) = self
            .analysis
            .tech_stack_extensions
            .iter()
            .find(|ext| !ext.starts_with('.') || ext.len() < 2)
        {
            return Err(Box::new(crate::validation_error!(
                format!("Extension '{}' must start with a dot", bad),
                "analysis.tech_stack_extensions",
                "config"
            )));
        }

        if self.pipeline.generation_timeout_secs == 0 {
            return Err(Box::new(crate::config_error!(
                "pipeline.generation_timeout_secs must be greater than 0",
                "config"
            )));
        }

        if self.llm.max_tokens == Some(0) {
            return Err(Box::new(crate::config_error!(
                "llm.max_tokens must be greater than 0",
                "config"
            )));
        }

        if self.acquisition.clone_depth == Some(0) {
            return Err(Box::new(crate::validation_error!(
                "Clone depth must be at least 1",
                "acquisition.clone_depth",
                "config"
            )));
        }

        Ok(())
    }
}
