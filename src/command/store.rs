use super::Command;
use crate::card::CardSink;
use crate::context::WorkflowContext;
use crate::error::FlowError;
use crate::reference::decorator;
use crate::reference::{RefDecorator, StringRef};
use crate::types::{render_inline, RefValue};
use async_trait::async_trait;

/// Store a literal value, optionally under a token and explicit file name.
#[derive(Debug, Clone)]
pub struct StoreCommand {
    value: RefValue,
    token: Option<String>,
    file_name: Option<String>,
}

impl StoreCommand {
    pub fn new(value: impl Into<RefValue>, token: Option<String>) -> Self {
        Self {
            value: value.into(),
            token,
            file_name: None,
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }
}

#[async_trait]
impl Command for StoreCommand {
    fn name(&self) -> &str {
        "Store"
    }

    async fn execute(
        &self,
        context: &mut dyn WorkflowContext,
        card: Option<&mut dyn CardSink>,
    ) -> Result<Vec<StringRef>, FlowError> {
        let mut decorators: Vec<Box<dyn RefDecorator>> = Vec::new();
        if let Some(token) = &self.token {
            decorators.push(decorator::token(token.clone()));
        }
        if let Some(file_name) = &self.file_name {
            decorators.push(decorator::file_name(file_name.clone()));
        }

        let stored = context.store(self.value.clone(), decorators).await?;
        if let Some(card) = card {
            card.title("Store");
            card.line("token", stored.token_or_id());
            card.line("value", &render_inline(&stored.content));
        }
        Ok(vec![stored])
    }
}
