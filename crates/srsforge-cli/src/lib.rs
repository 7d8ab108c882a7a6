//! Command-line interface for srsforge.
//!
//! Parses arguments, loads configuration (CLI flags > config file >
//! defaults), wires the standard pipeline, runs it, and reports the
//! outcome. All output happens here; `main` only maps the returned exit
//! code.

mod pipeline;

pub use pipeline::{PipelineDeps, standard_graph};

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use srsforge_config::Config;
use srsforge_engine::PipelineOrchestrator;
use srsforge_extraction::PlainTextExtractor;
use srsforge_llm::LlmBackend;
use srsforge_runner::{NullProvisioner, PodmanProvisioner, Provisioner, PytestRunner, TestRunner};
use srsforge_stage_api::ProjectLayout;
use srsforge_state::PipelineState;
use srsforge_utils::exit_codes::ExitCode;
use srsforge_utils::logging::init_tracing;

#[derive(Parser)]
#[command(name = "srsforge")]
#[command(about = "Generate a FastAPI web service from a Software Requirements Specification")]
#[command(long_about = r#"
srsforge turns an SRS document into a generated web-service codebase through
a five-stage pipeline: requirements extraction, project initialization,
test-suite generation, code generation, and verification with a single
repair cycle.

EXAMPLES:
  # Generate from an SRS document
  srsforge generate requirements.docx

  # Generate from inline SRS text
  srsforge generate "The system shall expose /api/users ..."

  # Custom output directory and model, no database/venv provisioning
  srsforge generate spec.txt --out my_api --model mistral-saba-24b --skip-provision

CONFIGURATION:
  Configuration is loaded with precedence: CLI flags > config file > defaults.
  srsforge.toml is discovered in the working directory; use --config for an
  explicit path. The LLM API key is read from the environment variable named
  in [llm] api_key_env (default GROQ_API_KEY) and is never stored.

EXIT CODES:
  0  pipeline completed successfully
  1  pipeline routed to the error sink (errors printed to stderr)
  2  invalid CLI arguments or configuration
  3  stage graph misconfiguration
"#)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full generation pipeline against an SRS reference
    Generate(GenerateArgs),
}

#[derive(clap::Args)]
pub struct GenerateArgs {
    /// SRS reference: a document path (.docx/.txt) or inline SRS text
    pub source: String,

    /// Output directory for the generated project
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Completion model to use
    #[arg(long)]
    pub model: Option<String>,

    /// Skip database and environment provisioning
    #[arg(long)]
    pub skip_provision: bool,
}

/// CLI entry point: parse, execute, report, map to an exit code.
pub async fn run() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.verbose) {
        eprintln!("warning: failed to initialize logging: {e}");
    }

    match execute(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::CLI_ARGS
        }
    }
}

async fn execute(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Commands::Generate(args) => generate(cli.config.as_deref(), args).await,
    }
}

async fn generate(
    config_path: Option<&std::path::Path>,
    args: GenerateArgs,
) -> anyhow::Result<ExitCode> {
    let mut config = Config::load(config_path)?;
    apply_overrides(&mut config, &args);

    let backend: Arc<dyn LlmBackend> = Arc::from(srsforge_llm::from_config(&config)?);
    let layout = ProjectLayout::new(config.project.root());

    let provisioner: Arc<dyn Provisioner> = if args.skip_provision || !config.provision.enabled() {
        Arc::new(NullProvisioner)
    } else {
        Arc::new(PodmanProvisioner::new(
            config.provision.database_image(),
            config.verify.python(),
        ))
    };
    let runner: Arc<dyn TestRunner> = Arc::new(PytestRunner::new(
        config.verify.python(),
        Duration::from_secs(config.verify.timeout_secs()),
    ));

    let graph = match standard_graph(PipelineDeps {
        backend,
        extractor: Arc::new(PlainTextExtractor::new()),
        provisioner,
        runner,
        layout,
        model: config.llm.model().to_string(),
        max_tokens: config.llm.max_tokens(),
    }) {
        Ok(graph) => graph,
        Err(e) => {
            eprintln!("stage graph misconfiguration: {e}");
            return Ok(ExitCode::GRAPH_CONFIG);
        }
    };

    let orchestrator = PipelineOrchestrator::new(graph);
    let report = match orchestrator.run(PipelineState::new(args.source)).await {
        Ok(report) => report,
        Err(e) => {
            eprintln!("stage graph misconfiguration: {e}");
            return Ok(ExitCode::GRAPH_CONFIG);
        }
    };

    for entry in &report.state.logs {
        println!("{entry}");
    }

    if report.succeeded() {
        Ok(ExitCode::SUCCESS)
    } else {
        for entry in &report.state.errors {
            eprintln!("error: {entry}");
        }
        Ok(ExitCode::PIPELINE_FAILED)
    }
}

/// CLI flags win over the loaded configuration.
fn apply_overrides(config: &mut Config, args: &GenerateArgs) {
    if let Some(model) = &args.model {
        config.llm.model = Some(model.clone());
    }
    if let Some(out) = &args.out {
        config.project.root = Some(out.clone());
    }
}
