//! Workflow Files
//!
//! A workflow is a YAML document listing steps, each one a built-in command.
//! Steps run in order against a single context; the first failing step stops the
//! run and refs stored by earlier steps stay in the context.

use crate::card::CardSink;
use crate::command::{
    Command, ExtractCommand, JoinCommand, LoadCommand, RegexMatchCommand, ShellCommand,
    SplitCommand, StoreCommand, TokenReplaceCommand,
};
use crate::context::WorkflowContext;
use crate::error::FlowError;
use crate::types::RefValue;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

fn default_true() -> bool {
    true
}

/// One step of a workflow file, tagged by `command`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum StepDefinition {
    Store {
        value: RefValue,
        #[serde(default)]
        token: Option<String>,
        #[serde(default)]
        file_name: Option<String>,
    },
    Load {
        path: PathBuf,
        #[serde(default)]
        token: Option<String>,
    },
    Shell {
        script: String,
        #[serde(default)]
        output: Option<String>,
    },
    TokenReplace {
        input: String,
        #[serde(default)]
        output: Option<String>,
    },
    Extract {
        input: String,
        pattern: String,
        #[serde(default)]
        output: Option<String>,
    },
    RegexMatch {
        input: String,
        pattern: String,
        #[serde(default = "default_true")]
        global: bool,
        #[serde(default)]
        output: Option<String>,
    },
    Split {
        input: String,
        delimiter: String,
        #[serde(default)]
        prefix: Option<String>,
    },
    Join {
        inputs: Vec<String>,
        #[serde(default)]
        delimiter: String,
        #[serde(default)]
        output: Option<String>,
    },
}

impl StepDefinition {
    /// Name of the command this step builds, as reported by `Command::name`.
    pub fn command_name(&self) -> &'static str {
        match self {
            StepDefinition::Store { .. } => "Store",
            StepDefinition::Load { .. } => "Load",
            StepDefinition::Shell { .. } => "Shell",
            StepDefinition::TokenReplace { .. } => "TokenReplace",
            StepDefinition::Extract { .. } => "Extract",
            StepDefinition::RegexMatch { .. } => "RegexMatch",
            StepDefinition::Split { .. } => "Split",
            StepDefinition::Join { .. } => "Join",
        }
    }

    /// Build the command for this step. Relative `load` paths and shell working
    /// directories resolve against `base_dir` when given.
    pub fn into_command(self, base_dir: Option<&Path>) -> Result<Box<dyn Command>, FlowError> {
        let resolve = |path: PathBuf| match base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path,
        };

        let command: Box<dyn Command> = match self {
            StepDefinition::Store {
                value,
                token,
                file_name,
            } => {
                let command = StoreCommand::new(value, token);
                match file_name {
                    Some(name) => Box::new(command.with_file_name(name)),
                    None => Box::new(command),
                }
            }
            StepDefinition::Load { path, token } => Box::new(LoadCommand::new(resolve(path), token)),
            StepDefinition::Shell { script, output } => {
                let command = ShellCommand::new(script, output);
                match base_dir {
                    Some(base) => Box::new(command.in_dir(base)),
                    None => Box::new(command),
                }
            }
            StepDefinition::TokenReplace { input, output } => {
                Box::new(TokenReplaceCommand::new(input, output))
            }
            StepDefinition::Extract {
                input,
                pattern,
                output,
            } => Box::new(ExtractCommand::new(input, &pattern, output)?),
            StepDefinition::RegexMatch {
                input,
                pattern,
                global,
                output,
            } => {
                let command = RegexMatchCommand::new(input, &pattern, output)?;
                if global {
                    Box::new(command)
                } else {
                    Box::new(command.first_only())
                }
            }
            StepDefinition::Split {
                input,
                delimiter,
                prefix,
            } => Box::new(SplitCommand::new(input, delimiter, prefix)),
            StepDefinition::Join {
                inputs,
                delimiter,
                output,
            } => Box::new(JoinCommand::new(inputs, delimiter, output)),
        };
        Ok(command)
    }
}

/// Parsed workflow file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    #[serde(default)]
    pub name: Option<String>,
    pub steps: Vec<StepDefinition>,
    /// Directory of the source file, set by `from_file`
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl WorkflowDefinition {
    pub fn from_yaml(source: &str) -> Result<Self, FlowError> {
        Ok(serde_yaml::from_str(source)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, FlowError> {
        let source = std::fs::read_to_string(path).map_err(|e| FlowError::io(path, e))?;
        let mut definition = Self::from_yaml(&source)?;
        definition.base_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf);
        Ok(definition)
    }
}

/// Outcome of one executed step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    pub index: usize,
    pub command: String,
    /// Ids of refs the step stored
    pub ref_ids: Vec<String>,
    /// Tokens of refs the step stored, where set
    pub tokens: Vec<String>,
}

/// Outcome of a completed workflow run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowReport {
    pub name: Option<String>,
    pub steps: Vec<StepReport>,
}

impl WorkflowReport {
    pub fn stored_count(&self) -> usize {
        self.steps.iter().map(|s| s.ref_ids.len()).sum()
    }
}

/// Sequential executor for workflow definitions.
pub struct WorkflowRunner;

impl WorkflowRunner {
    pub async fn run(
        context: &mut dyn WorkflowContext,
        definition: &WorkflowDefinition,
        mut card: Option<&mut dyn CardSink>,
    ) -> Result<WorkflowReport, FlowError> {
        let name = definition.name.clone();
        info!(
            workflow = name.as_deref().unwrap_or("<unnamed>"),
            steps = definition.steps.len(),
            "Running workflow"
        );

        let mut steps = Vec::with_capacity(definition.steps.len());
        for (index, step) in definition.steps.iter().enumerate() {
            let command_name = step.command_name();
            let result = match step.clone().into_command(definition.base_dir.as_deref()) {
                Ok(command) => {
                    debug!(step = index, command = command_name, "Running step");
                    let sink = card.as_mut().map(|c| &mut **c as &mut dyn CardSink);
                    context.run(command.as_ref(), sink).await
                }
                Err(e) => Err(e),
            };

            let refs = match result {
                Ok(refs) => refs,
                Err(e) => {
                    error!(step = index, command = command_name, error = %e, "Workflow step failed");
                    return Err(FlowError::workflow_step(index + 1, command_name, e));
                }
            };

            steps.push(StepReport {
                index,
                command: command_name.to_string(),
                ref_ids: refs.iter().map(|r| r.id.clone()).collect(),
                tokens: refs.iter().filter_map(|r| r.token.clone()).collect(),
            });
        }

        Ok(WorkflowReport { name, steps })
    }
}
