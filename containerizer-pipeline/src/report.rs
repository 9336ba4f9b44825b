//! JSON shapes returned at the request boundary

use crate::orchestrator::PipelineOutcome;
use containerizer_core::{AnalysisResult, ManifestFacts};
use containerizer_repo::languages::display_name;
use serde::{Deserialize, Serialize};

/// Serialized view of an `AnalysisResult`
///
/// `techStack` holds `[name, lineCount]` pairs with display names in place of
/// raw extensions; findings are rendered as sentences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub files: Vec<String>,
    pub tech_stack: Vec<(String, usize)>,
    pub manifest: ManifestFacts,
    pub has_dockerfile: bool,
    pub has_readme: bool,
    pub secure: bool,
    pub findings: Vec<String>,
    pub suggestions: Vec<String>,
}

impl From<&AnalysisResult> for AnalysisReport {
    fn from(analysis: &AnalysisResult) -> Self {
        Self {
            files: analysis
                .files()
                .iter()
                .map(|f| f.relative_path.clone())
                .collect(),
            tech_stack: analysis
                .tech_stack()
                .iter()
                .map(|s| (display_name(&s.extension).to_string(), s.line_count))
                .collect(),
            manifest: analysis.manifest().clone(),
            has_dockerfile: analysis.has_dockerfile(),
            has_readme: analysis.has_readme(),
            secure: analysis.secure(),
            findings: analysis.findings().iter().map(ToString::to_string).collect(),
            suggestions: analysis.suggestions().to_vec(),
        }
    }
}

/// Response for a full pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationReport {
    pub message: String,
    pub local_path: String,
    pub analysis: AnalysisReport,
    pub readme: String,
    pub dockerfile: Option<String>,
    pub artifacts: Vec<String>,
    pub artifact_error: Option<String>,
}

impl From<&PipelineOutcome> for GenerationReport {
    fn from(outcome: &PipelineOutcome) -> Self {
        let dockerfile = outcome
            .artifacts
            .iter()
            .find(|a| a.kind == containerizer_core::ArtifactKind::Dockerfile)
            .map(|a| a.content.clone());

        let message = match (&outcome.artifact_error, outcome.analysis.secure()) {
            (Some(_), _) => "Repository analyzed; writing artifacts failed.",
            (None, false) => "Repository analyzed; artifacts were not written because potential secrets were found.",
            (None, true) => "Repository processed and README/Dockerfile generated successfully.",
        };

        Self {
            message: message.to_string(),
            local_path: outcome.local_path.to_string_lossy().into_owned(),
            analysis: AnalysisReport::from(&outcome.analysis),
            readme: outcome.readme.clone(),
            dockerfile,
            artifacts: outcome.artifacts.iter().map(|a| a.path.clone()).collect(),
            artifact_error: outcome.artifact_error.as_ref().map(|e| e.to_string()),
        }
    }
}
