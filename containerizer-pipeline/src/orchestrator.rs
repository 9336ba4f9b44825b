//! One repository in, analysis and generated artifacts out

use containerizer_core::{
    log_operation_error, log_operation_start, log_operation_success, performance, with_timeout,
    AnalysisResult, ContainerizerConfig, ContainerizerError, ContainerizerResult,
    GeneratedArtifact, PipelineConfig, RepositoryFetcher, TextGenerator,
};
use containerizer_docs::{ArtifactWriter, PromptAssembler};
use containerizer_repo::{ContentCollector, RepositoryAnalyzer, TreeRenderer};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Everything one run produced
///
/// A failed write is recorded in `artifact_error` instead of failing the run,
/// so the analysis is returned either way. `artifacts` still lists whatever
/// was written before the failure.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub local_path: PathBuf,
    pub analysis: AnalysisResult,
    pub readme: String,
    pub artifacts: Vec<GeneratedArtifact>,
    pub artifact_error: Option<Box<ContainerizerError>>,
}

/// Sequences analyze, prompt, generate, re-scan and write for one request
pub struct Orchestrator {
    fetcher: Arc<dyn RepositoryFetcher>,
    generator: Arc<dyn TextGenerator>,
    analyzer: RepositoryAnalyzer,
    collector: ContentCollector,
    tree: TreeRenderer,
    assembler: PromptAssembler,
    writer: ArtifactWriter,
    config: PipelineConfig,
}

impl Orchestrator {
    pub fn new(
        config: &ContainerizerConfig,
        fetcher: Arc<dyn RepositoryFetcher>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        let analyzer = RepositoryAnalyzer::new(&config.analysis);
        Self {
            fetcher,
            generator,
            collector: ContentCollector::new(config.analysis.max_concurrent_reads),
            tree: TreeRenderer::new(analyzer.walker().clone()),
            analyzer,
            assembler: PromptAssembler::new(),
            writer: ArtifactWriter::new(),
            config: config.pipeline.clone(),
        }
    }

    pub fn analyzer(&self) -> &RepositoryAnalyzer {
        &self.analyzer
    }

    /// Fetch `remote_url` and run the pipeline on the working copy
    pub async fn run(&self, remote_url: &str) -> ContainerizerResult<PipelineOutcome> {
        log_operation_start!("fetch_repository", repo_url = %remote_url);
        let local_path = match self.fetcher.fetch(remote_url).await {
            Ok(path) => path,
            Err(e) => {
                log_operation_error!("fetch_repository", e);
                return Err(e);
            }
        };
        log_operation_success!("fetch_repository", local_path = %local_path.display());

        self.run_local(&local_path).await
    }

    /// Run the pipeline on an existing working copy
    pub async fn run_local(&self, root: &Path) -> ContainerizerResult<PipelineOutcome> {
        let analysis =
            performance::measure_async("analyze_repository", self.analyzer.analyze(root)).await?;

        let contents = self.collector.collect(root, &analysis).await;
        let directory_tree = self.tree.render(root)?;
        let prompt = self.assembler.assemble(&contents, &directory_tree);

        let readme = self.generate_readme(&prompt.system_prompt, &prompt.user_prompt).await?;

        // The tree may have changed while the completion was pending
        let rescan = self.analyzer.scanner().scan(root).await;
        let analysis = if rescan.findings != analysis.findings() {
            warn!(
                before = analysis.findings().len(),
                after = rescan.findings.len(),
                "Secret findings changed during generation"
            );
            analysis.with_findings(rescan.findings)
        } else {
            analysis
        };

        let (artifacts, artifact_error) = if self.config.write_artifacts {
            let written = self.writer.materialize(root, &analysis, Some(&readme)).await;
            if let Some(e) = &written.error {
                e.log();
            }
            (written.written, written.error)
        } else {
            info!("Artifact writing disabled, leaving the tree untouched");
            (Vec::new(), None)
        };

        info!(
            root = %root.display(),
            secure = analysis.secure(),
            artifacts = artifacts.len(),
            "Pipeline finished"
        );

        Ok(PipelineOutcome {
            local_path: root.to_path_buf(),
            analysis,
            readme,
            artifacts,
            artifact_error,
        })
    }

    async fn generate_readme(&self, system_prompt: &str, user_prompt: &str) -> ContainerizerResult<String> {
        log_operation_start!("generate_readme", prompt_chars = user_prompt.len());

        let timeout_ms = self.config.generation_timeout_secs.saturating_mul(1000);
        let result = with_timeout(
            self.generator.generate(system_prompt, user_prompt),
            timeout_ms,
            "generate_readme",
        )
        .await
        .and_then(|generated| generated);

        match &result {
            Ok(readme) => {
                log_operation_success!("generate_readme", chars = readme.len());
            }
            Err(e) => {
                log_operation_error!("generate_readme", e);
            }
        }
        result
    }
}
