use super::Command;
use crate::card::CardSink;
use crate::context::WorkflowContext;
use crate::error::FlowError;
use crate::reference::StringRef;
use async_trait::async_trait;
use std::path::PathBuf;

/// Register an existing file's contents through `WorkflowContext::load`.
#[derive(Debug, Clone)]
pub struct LoadCommand {
    path: PathBuf,
    token: Option<String>,
}

impl LoadCommand {
    pub fn new(path: impl Into<PathBuf>, token: Option<String>) -> Self {
        Self {
            path: path.into(),
            token,
        }
    }
}

#[async_trait]
impl Command for LoadCommand {
    fn name(&self) -> &str {
        "Load"
    }

    async fn execute(
        &self,
        context: &mut dyn WorkflowContext,
        card: Option<&mut dyn CardSink>,
    ) -> Result<Vec<StringRef>, FlowError> {
        let loaded = context.load(&self.path, self.token.as_deref()).await?;
        if let Some(card) = card {
            card.title("Load");
            card.line("path", &self.path.display().to_string());
            card.line("token", loaded.token_or_id());
        }
        Ok(vec![loaded])
    }
}
