//! CLI Tooling
//!
//! `refchain run` executes a workflow file against a fresh context;
//! `refchain config` prints the effective configuration.

use crate::card::{CardSink, TextCard};
use crate::config::{ConfigLoader, FlowConfig};
use crate::context;
use crate::error::FlowError;
use crate::logging::LoggingConfig;
use crate::workflow::{WorkflowDefinition, WorkflowReport, WorkflowRunner};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

/// Refchain CLI - token-addressed reference workflows
#[derive(Parser)]
#[command(name = "refchain")]
#[command(about = "Run reference workflows with recorded provenance")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Apply logging flags on top of the configured values. `--log-file` is not
    /// merged here; it goes to `init_logging` directly so it outranks the env.
    pub fn logging_config(&self, base: &LoggingConfig) -> LoggingConfig {
        let mut logging = base.clone();
        if let Some(level) = &self.log_level {
            logging.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            logging.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            logging.output = output.clone();
        }
        logging
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a workflow file
    Run {
        /// Workflow YAML file
        workflow: PathBuf,
        /// Persist refs under this directory (default: keep in memory)
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Print the effective configuration as JSON
    Config,
}

/// Loaded configuration bound to a workspace root.
pub struct CliContext {
    workspace_root: PathBuf,
    config: FlowConfig,
}

impl CliContext {
    /// Create a new CLI context
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, FlowError> {
        let config = match &config_path {
            Some(path) => ConfigLoader::load_from_file(path),
            None => ConfigLoader::load(&workspace_root),
        }
        .map_err(|e| FlowError::ConfigError(e.to_string()))?;

        Ok(Self {
            workspace_root,
            config,
        })
    }

    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    /// Execute a CLI command, returning the text to print.
    pub async fn execute(&self, command: &Commands) -> Result<String, FlowError> {
        match command {
            Commands::Run {
                workflow,
                output_dir,
                format,
            } => self.handle_run(workflow, output_dir.clone(), format).await,
            Commands::Config => Ok(serde_json::to_string_pretty(&self.config)?),
        }
    }

    async fn handle_run(
        &self,
        workflow: &Path,
        output_dir: Option<PathBuf>,
        format: &str,
    ) -> Result<String, FlowError> {
        if format != "text" && format != "json" {
            return Err(FlowError::ConfigError(format!(
                "Invalid output format: {} (must be 'text' or 'json')",
                format
            )));
        }

        let mut effective = self.config.clone();
        if output_dir.is_some() {
            effective.output_dir = output_dir;
        }
        effective.output_dir = effective.resolve_output_dir(&self.workspace_root);

        let definition = WorkflowDefinition::from_file(workflow)?;
        let mut ctx = context::from_config(&effective);
        let mut card = TextCard::new();

        let report =
            WorkflowRunner::run(ctx.as_mut(), &definition, Some(&mut card as &mut dyn CardSink))
                .await?;
        info!(
            steps = report.steps.len(),
            stored = report.stored_count(),
            "Workflow complete"
        );

        if format == "json" {
            return Ok(serde_json::to_string_pretty(&report)?);
        }
        Ok(format_report_text(&report, &card, effective.output_dir.as_deref()))
    }
}

fn format_report_text(
    report: &WorkflowReport,
    card: &TextCard,
    output_dir: Option<&Path>,
) -> String {
    let mut out = card.render();
    out.push_str(&format!(
        "Workflow {}: {} steps, {} refs stored\n",
        report.name.as_deref().unwrap_or("<unnamed>"),
        report.steps.len(),
        report.stored_count()
    ));
    for step in &report.steps {
        let labels = if step.tokens.is_empty() {
            step.ref_ids.join(", ")
        } else {
            step.tokens.join(", ")
        };
        out.push_str(&format!("  {}. {} -> {}\n", step.index + 1, step.command, labels));
    }
    if let Some(dir) = output_dir {
        out.push_str(&format!("Output: {}\n", dir.display()));
    }
    out.trim_end().to_string()
}
