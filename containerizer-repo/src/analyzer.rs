//! Repository analysis: composes the tech stack, secret and manifest passes

use crate::filter::is_prompt_source;
use crate::manifest::ManifestDetector;
use crate::secrets::SecretScanner;
use crate::tech_stack::{rank_tech_stack, TechStackAggregator};
use crate::walker::DirectoryWalker;
use containerizer_core::{
    log_operation_start, log_operation_success, AnalysisConfig, AnalysisResult,
    ContainerizerError, ContainerizerResult, ErrorContext,
};
use std::path::Path;

/// Runs every analysis pass over one working copy
#[derive(Debug, Clone)]
pub struct RepositoryAnalyzer {
    walker: DirectoryWalker,
    tech_stack: TechStackAggregator,
    scanner: SecretScanner,
    detector: ManifestDetector,
}

impl RepositoryAnalyzer {
    pub fn new(config: &AnalysisConfig) -> Self {
        let walker = DirectoryWalker::new(config.ignored_dirs.iter().cloned());
        Self {
            tech_stack: TechStackAggregator::new(
                walker.clone(),
                &config.tech_stack_extensions,
                config.max_concurrent_reads,
            ),
            scanner: SecretScanner::new(walker.clone(), config.max_concurrent_reads),
            detector: ManifestDetector::new(walker.clone()),
            walker,
        }
    }

    pub fn walker(&self) -> &DirectoryWalker {
        &self.walker
    }

    pub fn scanner(&self) -> &SecretScanner {
        &self.scanner
    }

    /// Analyze the working copy at `root`
    ///
    /// The three passes run concurrently and each owns its accumulation; the
    /// result is assembled only after all of them finish.
    pub async fn analyze(&self, root: &Path) -> ContainerizerResult<AnalysisResult> {
        if !root.is_dir() {
            return Err(Box::new(ContainerizerError::Analysis {
                message: format!("{} is not a directory", root.display()),
                source: None,
                context: ErrorContext::new("repository_analyzer")
                    .with_operation("analyze")
                    .with_suggestion("Pass the root of a local working copy"),
            }));
        }

        log_operation_start!("analyze_repository", root = %root.display());

        let (line_totals, scan, manifest) = tokio::join!(
            self.tech_stack.count_lines(root),
            self.scanner.scan(root),
            async { self.detector.detect(root) },
        );

        let mut files = self.walker.walk(root, Some(&is_prompt_source));
        files.sort();

        let result = AnalysisResult::new(
            files,
            rank_tech_stack(line_totals),
            manifest.facts,
            manifest.has_dockerfile,
            manifest.has_readme,
            scan.findings,
            manifest.suggestions,
        );

        log_operation_success!(
            "analyze_repository",
            language = %result.manifest().language_or_unknown(),
            files = result.files().len(),
            total_lines = result.total_lines(),
            secure = result.secure()
        );

        Ok(result)
    }
}

impl Default for RepositoryAnalyzer {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}
