//! Shell-out command.
//!
//! Runs a script through `sh -c` after `{{token}}` substitution and stores its
//! trimmed stdout. No retries or timeouts: a script that never exits keeps
//! `run` pending.

use super::token_replace::substitute_tokens;
use super::transform::TransformParams;
use super::Command;
use crate::card::CardSink;
use crate::context::WorkflowContext;
use crate::error::FlowError;
use crate::reference::decorator;
use crate::reference::{RefDecorator, StringRef, TransformMetadata};
use crate::types::RefValue;
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

/// Lineage type recorded for shell output
pub const SHELL_TRANSFORM: &str = "Shell";

/// Inputs are only known after substitution, so lineage lists the tokens that
/// were actually substituted into the script.
#[derive(Debug, Clone)]
pub struct ShellCommand {
    script: String,
    output_token: Option<String>,
    working_dir: Option<PathBuf>,
}

impl ShellCommand {
    pub fn new(script: impl Into<String>, output_token: Option<String>) -> Self {
        Self {
            script: script.into(),
            output_token,
            working_dir: None,
        }
    }

    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}

#[async_trait]
impl Command for ShellCommand {
    fn name(&self) -> &str {
        SHELL_TRANSFORM
    }

    async fn execute(
        &self,
        context: &mut dyn WorkflowContext,
        card: Option<&mut dyn CardSink>,
    ) -> Result<Vec<StringRef>, FlowError> {
        let substitution = substitute_tokens(context, &self.script);

        let mut process = tokio::process::Command::new("sh");
        process.arg("-c").arg(&substitution.text);
        if let Some(dir) = &self.working_dir {
            process.current_dir(dir);
        }
        debug!(script = %self.script, "Running shell script");
        let output = process
            .output()
            .await
            .map_err(|e| FlowError::CommandFailed(format!("Failed to spawn sh: {}", e)))?;

        let exit_code = output.status.code();
        if !output.status.success() {
            return Err(FlowError::CommandFailed(format!(
                "Script exited with {}: {}",
                exit_code
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "signal".to_string()),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout).trim_end().to_string();
        if let Some(card) = card {
            card.title("Shell");
            card.line("script", &self.script);
            card.line("bytes", &stdout.len().to_string());
        }

        let mut params = TransformParams::new();
        params.insert("script".to_string(), RefValue::String(self.script.clone()));
        params.insert("exitCode".to_string(), RefValue::from(exit_code.unwrap_or(0)));
        let lineage = TransformMetadata::new(SHELL_TRANSFORM, substitution.replaced, params);

        let mut decorators: Vec<Box<dyn RefDecorator>> = vec![decorator::metadata(lineage)];
        if let Some(token) = &self.output_token {
            decorators.push(decorator::token(token.clone()));
        }
        let stored = context.store(RefValue::String(stdout), decorators).await?;
        Ok(vec![stored])
    }
}
