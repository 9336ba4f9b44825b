//! Core trait definitions
//!
//! The pipeline talks to its two external collaborators only through these traits.

use crate::error::ContainerizerResult;
use async_trait::async_trait;
use std::path::PathBuf;

/// Materializes a remote repository as a local working copy
#[async_trait]
pub trait RepositoryFetcher: Send + Sync {
    /// Fetch `remote_url` and return the local root path.
    ///
    /// Any transport or authentication problem is reported as
    /// `ContainerizerError::AcquisitionFailed`.
    async fn fetch(&self, remote_url: &str) -> ContainerizerResult<PathBuf>;
}

/// Prompt-in / completion-out text generation service
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion. Failures are reported as
    /// `ContainerizerError::GenerationFailed`.
    async fn generate(&self, system_prompt: &str, user_prompt: &str)
        -> ContainerizerResult<String>;
}
