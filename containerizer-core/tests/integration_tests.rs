//! Integration tests for containerizer-core infrastructure

use containerizer_core::{
    config_error, repository_error, validation_error, ContainerizerConfig, ContainerizerError,
    ErrorContext, LogFormat, LoggingConfig,
};
use tempfile::TempDir;

#[test]
fn test_error_handling() {
    let error = repository_error!("Test repository error", "test_component");

    match &error {
        ContainerizerError::Repository {
            message, context, ..
        } => {
            assert_eq!(message, "Test repository error");
            assert_eq!(context.component, "test_component");
            assert!(!context.error_id.is_empty());
        }
        _ => panic!("Expected Repository error"),
    }

    // Logging without a subscriber must not panic
    error.log();
    assert_eq!(error.stage(), "analysis");

    let acquisition = ContainerizerError::AcquisitionFailed {
        message: "git clone exited with 128".to_string(),
        source: None,
        context: ErrorContext::new("test"),
    };
    assert_eq!(acquisition.stage(), "acquisition");

    let config = config_error!("Invalid config", "test");
    assert_eq!(config.stage(), "configuration");
    assert_eq!(
        config.context().map(|c| c.recovery_suggestions.len()),
        Some(2)
    );

    let validation = validation_error!("bad value", "llm.model", "test");
    match validation {
        ContainerizerError::Validation { field, .. } => {
            assert_eq!(field.as_deref(), Some("llm.model"))
        }
        _ => panic!("Expected Validation error"),
    }
}

#[test]
fn test_config_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");

    let mut config = ContainerizerConfig::default();
    config.analysis.max_concurrent_reads = 4;
    config.llm.provider = "openai".to_string();
    config.logging = LoggingConfig {
        format: LogFormat::Json,
        ..LoggingConfig::default()
    };
    config.save_to_file(&path).unwrap();

    let loaded = ContainerizerConfig::from_file(&path).unwrap();
    assert_eq!(loaded.analysis.max_concurrent_reads, 4);
    assert_eq!(loaded.llm.provider, "openai");
    assert_eq!(loaded.logging.format, LogFormat::Json);
    assert_eq!(loaded.analysis.ignored_dirs, config.analysis.ignored_dirs);
    assert!(loaded.validate().is_ok());
}

#[test]
fn test_partial_config_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "[pipeline]\ngeneration_timeout_secs = 30\n").unwrap();

    let loaded = ContainerizerConfig::from_file(&path).unwrap();
    assert_eq!(loaded.pipeline.generation_timeout_secs, 30);
    assert!(loaded.pipeline.write_artifacts);
    assert!(loaded
        .analysis
        .ignored_dirs
        .iter()
        .any(|d| d == "node_modules"));
}

#[test]
fn test_config_validation() {
    let mut config = ContainerizerConfig::default();
    assert!(config.validate().is_ok());

    config.analysis.max_concurrent_reads = 0;
    assert!(config.validate().is_err());

    let mut config = ContainerizerConfig::default();
    config.analysis.tech_stack_extensions.push("py".to_string());
    let err = config.validate().unwrap_err();
    assert!(matches!(*err, ContainerizerError::Validation { .. }));
}

#[test]
fn test_malformed_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "[analysis\nmax_concurrent_reads = ").unwrap();

    let err = ContainerizerConfig::from_file(&path).unwrap_err();
    assert!(matches!(*err, ContainerizerError::Config { .. }));
}
