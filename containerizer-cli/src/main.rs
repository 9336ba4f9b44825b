//! Containerizer CLI - command-line front end for repository analysis
//!
//! Analyzes a repository, generates a README through the configured LLM and
//! writes a Dockerfile when the repository is safe to containerize.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use containerizer_core::{
    init_logging, log_operation_error, log_operation_start, log_operation_success,
    ContainerizerConfig, RepositoryFetcher,
};
use containerizer_llm::ContainerizerLlmClient;
use containerizer_pipeline::{AnalysisReport, GenerationReport, Orchestrator};
use containerizer_repo::{GitCloneFetcher, RepositoryAnalyzer, TreeRenderer};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "containerizer")]
#[command(about = "Analyze repositories and generate README and Dockerfile artifacts")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a local working copy and print the report as JSON
    Analyze {
        /// Repository root
        path: PathBuf,
    },

    /// Print the directory tree used in the README prompt
    Tree {
        /// Repository root
        path: PathBuf,
    },

    /// Run the full pipeline: fetch, analyze, generate README, write artifacts
    Generate {
        /// Repository URL or local path
        repo: String,

        /// Access token for private repositories
        #[arg(short, long)]
        token: Option<String>,

        /// Analyze and generate without writing into the repository
        #[arg(long)]
        dry_run: bool,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Initialize default configuration
        #[arg(long)]
        init: bool,

        /// Validate current configuration
        #[arg(long)]
        validate: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;

    let mut logging_config = config.logging.clone();
    if cli.verbose {
        logging_config.level = "debug".to_string();
    }
    init_logging(&logging_config)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Starting containerizer v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Analyze { path } => handle_analyze(&path, &config).await?,
        Commands::Tree { path } => handle_tree(&path, &config)?,
        Commands::Generate {
            repo,
            token,
            dry_run,
        } => handle_generate(repo, token, dry_run, config).await?,
        Commands::Config {
            show,
            init,
            validate,
        } => handle_config(show, init, validate, &config)?,
    }

    Ok(())
}

fn load_config(config_path: Option<&Path>) -> anyhow::Result<ContainerizerConfig> {
    if let Some(path) = config_path {
        return ContainerizerConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()));
    }

    let default_paths = [
        get_config_path(),
        Some(PathBuf::from("containerizer.toml")),
    ];

    for path in default_paths.iter().flatten() {
        if path.exists() {
            return ContainerizerConfig::from_file(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()));
        }
    }

    Ok(ContainerizerConfig::default())
}

/// Default configuration file location
fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|d| d.join(".config")))
        .map(|d| d.join("containerizer").join("config.toml"))
}

async fn handle_analyze(path: &Path, config: &ContainerizerConfig) -> anyhow::Result<()> {
    log_operation_start!("analyze", path = %path.display());

    let analysis = RepositoryAnalyzer::new(&config.analysis)
        .analyze(path)
        .await
        .map_err(|e| {
            log_operation_error!("analyze", e);
            e
        })?;

    log_operation_success!("analyze", secure = analysis.secure());
    println!(
        "{}",
        serde_json::to_string_pretty(&AnalysisReport::from(&analysis))?
    );
    Ok(())
}

fn handle_tree(path: &Path, config: &ContainerizerConfig) -> anyhow::Result<()> {
    let analyzer = RepositoryAnalyzer::new(&config.analysis);
    let tree = TreeRenderer::new(analyzer.walker().clone()).render(path)?;
    print!("{}", tree);
    Ok(())
}

async fn handle_generate(
    repo: String,
    token: Option<String>,
    dry_run: bool,
    mut config: ContainerizerConfig,
) -> anyhow::Result<()> {
    let configured_token = config.acquisition.access_token.take();
    config.acquisition.access_token = token
        .or(configured_token)
        .or_else(|| std::env::var("GITHUB_TOKEN").ok());
    if dry_run {
        config.pipeline.write_artifacts = false;
    }
    config.validate()?;

    let generator = ContainerizerLlmClient::new(config.llm.clone())
        .await
        .context("Failed to create LLM client")?;
    let fetcher: Arc<dyn RepositoryFetcher> = Arc::new(GitCloneFetcher::new(&config.acquisition));
    let orchestrator = Orchestrator::new(&config, fetcher, Arc::new(generator));

    let local = Path::new(&repo);
    let outcome = if local.is_dir() {
        orchestrator.run_local(local).await?
    } else {
        orchestrator.run(&repo).await?
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&GenerationReport::from(&outcome))?
    );

    if let Some(e) = &outcome.artifact_error {
        bail!("Analysis succeeded but artifacts could not be written: {}", e);
    }
    Ok(())
}

fn handle_config(
    show: bool,
    init: bool,
    validate: bool,
    config: &ContainerizerConfig,
) -> anyhow::Result<()> {
    if init {
        let config_path = get_config_path().context("Could not determine config directory")?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        ContainerizerConfig::default().save_to_file(&config_path)?;
        println!("Configuration initialized at: {}", config_path.display());
        println!("Edit the file to set your LLM provider and API key.");
    }

    if show {
        println!("{}", toml::to_string_pretty(config)?);
    }

    if validate {
        match config.validate() {
            Ok(()) => println!("Configuration is valid"),
            Err(e) => bail!("Configuration validation failed: {}", e),
        }
    }

    Ok(())
}
