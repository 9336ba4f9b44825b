//! Unified error handling system
//!
//! Provides structured error types with context, recovery suggestions, and proper error chaining

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

pub type ContainerizerResult<T> = Result<T, Box<ContainerizerError>>;

/// Error context providing additional information for debugging and recovery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Timestamp when error occurred
    pub timestamp: DateTime<Utc>,
    /// Component where error originated
    pub component: String,
    /// Operation being performed when error occurred
    pub operation: Option<String>,
    /// Additional metadata
    pub metadata: std::collections::HashMap<String, String>,
    /// Recovery suggestions
    pub recovery_suggestions: Vec<String>,
}

impl ErrorContext {
    pub fn new(component: &str) -> Self {
        Self {
            error_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            component: component.to_string(),
            operation: None,
            metadata: std::collections::HashMap::new(),
            recovery_suggestions: Vec::new(),
        }
    }

    pub fn with_operation(mut self, operation: &str) -> Self {
        self.operation = Some(operation.to_string());
        self
    }

    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.recovery_suggestions.push(suggestion.to_string());
        self
    }
}

/// Main error type for the containerizer pipeline
#[derive(Error, Debug)]
pub enum ContainerizerError {
    #[error("Repository error: {message}")]
    Repository {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Analysis error: {message}")]
    Analysis {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    /// The repository could not be fetched into a local working copy
    #[error("Repository acquisition failed: {message}")]
    AcquisitionFailed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    /// The text-generation service did not return a completion
    #[error("Text generation failed: {message}")]
    GenerationFailed {
        message: String,
        provider: Option<String>,
        model: Option<String>,
        context: ErrorContext,
    },

    #[error("Failed to write {artifact}: {message}")]
    ArtifactWrite {
        artifact: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
        context: ErrorContext,
    },

    #[error("Operation timeout: {operation}")]
    Timeout {
        operation: String,
        duration_ms: u64,
        context: ErrorContext,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },
}

impl ContainerizerError {
    /// Get the error context
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            ContainerizerError::Repository { context, .. } => Some(context),
            ContainerizerError::Analysis { context, .. } => Some(context),
            ContainerizerError::AcquisitionFailed { context, .. } => Some(context),
            ContainerizerError::GenerationFailed { context, .. } => Some(context),
            ContainerizerError::ArtifactWrite { context, .. } => Some(context),
            ContainerizerError::Config { context, .. } => Some(context),
            ContainerizerError::Validation { context, .. } => Some(context),
            ContainerizerError::Timeout { context, .. } => Some(context),
            ContainerizerError::Internal { context, .. } => Some(context),
            ContainerizerError::Io(_) | ContainerizerError::Serialization(_) => None,
        }
    }

    /// Name of the pipeline stage that failed, used in top-level failure reports
    pub fn stage(&self) -> &'static str {
        match self {
            ContainerizerError::AcquisitionFailed { .. } => "acquisition",
            ContainerizerError::GenerationFailed { .. } | ContainerizerError::Timeout { .. } => {
                "generation"
            }
            ContainerizerError::ArtifactWrite { .. } => "artifact_write",
            ContainerizerError::Config { .. } | ContainerizerError::Validation { .. } => {
                "configuration"
            }
            ContainerizerError::Repository { .. }
            | ContainerizerError::Analysis { .. }
            | ContainerizerError::Io(_) => "analysis",
            ContainerizerError::Serialization(_) | ContainerizerError::Internal { .. } => {
                "internal"
            }
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        let error_id = self.context().map(|c| c.error_id.as_str());
        match self {
            ContainerizerError::Internal { .. } => {
                error!(error_id = ?error_id, error = %self, "Internal error occurred");
            }
            ContainerizerError::Config { .. } | ContainerizerError::Validation { .. } => {
                error!(error_id = ?error_id, error = %self, "Configuration or validation error");
            }
            ContainerizerError::AcquisitionFailed { .. }
            | ContainerizerError::GenerationFailed { .. }
            | ContainerizerError::Timeout { .. } => {
                warn!(error_id = ?error_id, error = %self, "External collaborator failed");
            }
            _ => {
                error!(error_id = ?error_id, error = %self, "Error occurred");
            }
        }
    }
}

/// Convenience macros for creating errors with context
#[macro_export]
macro_rules! repository_error {
    ($msg:expr, $component:expr) => {
        $crate::ContainerizerError::Repository {
            message: $msg.to_string(),
            source: None,
            context: $crate::ErrorContext::new($component),
        }
    };
    ($msg:expr, $component:expr, $source:expr) => {
        $crate::ContainerizerError::Repository {
            message: $msg.to_string(),
            source: Some(Box::new($source)),
            context: $crate::ErrorContext::new($component),
        }
    };
}

#[macro_export]
macro_rules! config_error {
    ($msg:expr, $component:expr) => {
        $crate::ContainerizerError::Config {
            message: $msg.to_string(),
            source: None,
            context: $crate::ErrorContext::new($component)
                .with_suggestion("Check your configuration file")
                .with_suggestion("Run 'containerizer config --init' to create default config"),
        }
    };
}

#[macro_export]
macro_rules! validation_error {
    ($msg:expr, $field:expr, $component:expr) => {
        $crate::ContainerizerError::Validation {
            message: $msg.to_string(),
            field: Some($field.to_string()),
            context: $crate::ErrorContext::new($component)
                .with_suggestion("Check the field value and format"),
        }
    };
}
