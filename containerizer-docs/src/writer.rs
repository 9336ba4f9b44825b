//! Materializes generated artifacts into the analyzed tree
//!
//! Nothing is written when the analysis reports potential secrets, and an
//! existing file is never replaced.

use crate::templates::{DockerTemplate, DOCKERIGNORE};
use containerizer_core::{
    AnalysisResult, ArtifactKind, ContainerizerError, ContainerizerResult, ErrorContext,
    GeneratedArtifact,
};
use std::fmt;
use std::future::Future;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

/// Why an artifact was not written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Insecure,
    AlreadyExists,
    NoCode,
    NotGenerated,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            SkipReason::Insecure => "potential secrets detected",
            SkipReason::AlreadyExists => "file already exists",
            SkipReason::NoCode => "no source code detected",
            SkipReason::NotGenerated => "no README content was generated",
        };
        f.write_str(reason)
    }
}

/// Which artifacts a given analysis allows, decided before touching the disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WritePlan {
    pub readme: Result<(), SkipReason>,
    pub dockerfile: Result<DockerTemplate, SkipReason>,
}

impl WritePlan {
    pub fn for_analysis(analysis: &AnalysisResult, readme_available: bool) -> Self {
        if !analysis.secure() {
            return Self {
                readme: Err(SkipReason::Insecure),
                dockerfile: Err(SkipReason::Insecure),
            };
        }

        let readme = if analysis.has_readme() {
            Err(SkipReason::AlreadyExists)
        } else if !readme_available {
            Err(SkipReason::NotGenerated)
        } else {
            Ok(())
        };

        let dockerfile = if analysis.has_dockerfile() {
            Err(SkipReason::AlreadyExists)
        } else if !has_code(analysis) {
            Err(SkipReason::NoCode)
        } else {
            Ok(DockerTemplate::for_manifest(analysis.manifest()))
        };

        Self { readme, dockerfile }
    }
}

/// True when any allow-listed source extension was counted
pub fn has_code(analysis: &AnalysisResult) -> bool {
    analysis.tech_stack().iter().any(|stat| stat.line_count > 0)
}

/// What one `materialize` call wrote, and the failure that stopped it
///
/// Artifacts written before a failure stay on disk and stay listed here.
#[derive(Debug, Default)]
pub struct MaterializeOutcome {
    pub written: Vec<GeneratedArtifact>,
    pub error: Option<Box<ContainerizerError>>,
}

impl MaterializeOutcome {
    pub fn wrote(&self, kind: ArtifactKind) -> bool {
        self.written.iter().any(|a| a.kind == kind)
    }

    /// Written artifacts, or the error if a write failed
    pub fn into_result(self) -> ContainerizerResult<Vec<GeneratedArtifact>> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.written),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ArtifactWriter;

impl ArtifactWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write whichever of README, Dockerfile and .dockerignore the analysis allows
    ///
    /// A file that appears on disk between analysis and writing is skipped,
    /// not overwritten. The first failed write stops the remaining ones.
    pub async fn materialize(
        &self,
        root: &Path,
        analysis: &AnalysisResult,
        generated_readme: Option<&str>,
    ) -> MaterializeOutcome {
        let plan = WritePlan::for_analysis(analysis, generated_readme.is_some());
        let mut planned = Vec::new();

        match (plan.readme, generated_readme) {
            (Ok(()), Some(readme)) => planned.push((ArtifactKind::Readme, readme.to_string())),
            (Err(reason), _) => {
                info!(reason = %reason, "Skipping README.md");
            }
            (Ok(()), None) => {}
        }

        match plan.dockerfile {
            Ok(template) => {
                info!(template = %template, "Generating Dockerfile");
                planned.push((ArtifactKind::Dockerfile, template.render(analysis.manifest())));
                planned.push((ArtifactKind::DockerIgnore, DOCKERIGNORE.to_string()));
            }
            Err(reason) => {
                info!(reason = %reason, "Skipping Dockerfile");
            }
        }

        write_planned(planned, |kind, content| async move {
            write_new(root, kind, &content).await
        })
        .await
    }
}

/// Run `write` over the planned artifacts in order
///
/// `.dockerignore` is only attempted once a Dockerfile was written in the
/// same pass.
async fn write_planned<F, Fut>(planned: Vec<(ArtifactKind, String)>, mut write: F) -> MaterializeOutcome
where
    F: FnMut(ArtifactKind, String) -> Fut,
    Fut: Future<Output = ContainerizerResult<Option<GeneratedArtifact>>>,
{
    let mut outcome = MaterializeOutcome::default();

    for (kind, content) in planned {
        if kind == ArtifactKind::DockerIgnore && !outcome.wrote(ArtifactKind::Dockerfile) {
            continue;
        }
        match write(kind, content).await {
            Ok(Some(artifact)) => outcome.written.push(artifact),
            Ok(None) => {}
            Err(e) => {
                warn!(artifact = kind.file_name(), written = outcome.written.len(), "Stopping after failed write");
                outcome.error = Some(e);
                break;
            }
        }
    }

    outcome
}

/// Create `kind`'s file at the root; `None` when it already exists
///
/// A file that fails mid-write is removed so no partial artifact remains.
async fn write_new(
    root: &Path,
    kind: ArtifactKind,
    content: &str,
) -> ContainerizerResult<Option<GeneratedArtifact>> {
    let path = root.join(kind.file_name());

    let mut file = match OpenOptions::new().write(true).create_new(true).open(&path).await {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            warn!(path = %path.display(), reason = %SkipReason::AlreadyExists, "Not overwriting artifact");
            return Ok(None);
        }
        Err(e) => return Err(artifact_error(kind, "create", e)),
    };

    let result = async {
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        file.sync_all().await
    }
    .await;

    if let Err(e) = result {
        drop(file);
        if let Err(cleanup) = fs::remove_file(&path).await {
            warn!(path = %path.display(), error = %cleanup, "Failed to remove partial artifact");
        }
        return Err(artifact_error(kind, "write", e));
    }

    info!(path = %path.display(), bytes = content.len(), "Artifact written");
    Ok(Some(GeneratedArtifact {
        kind,
        path: path.to_string_lossy().into_owned(),
        content: content.to_string(),
    }))
}

fn artifact_error(kind: ArtifactKind, operation: &str, e: std::io::Error) -> Box<ContainerizerError> {
    Box::new(ContainerizerError::ArtifactWrite {
        artifact: kind.file_name().to_string(),
        message: format!("Failed to {} file: {}", operation, e),
        source: Some(Box::new(e)),
        context: ErrorContext::new("artifact_writer")
            .with_operation(operation)
            .with_suggestion("Check write permissions on the repository directory"),
    })
}
