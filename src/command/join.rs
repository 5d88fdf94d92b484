use super::transform::{TransformCommand, TransformParams};
use super::{require_token, Command};
use crate::card::CardSink;
use crate::context::WorkflowContext;
use crate::error::FlowError;
use crate::reference::StringRef;
use crate::types::{render_inline, RefValue};
use async_trait::async_trait;

/// Join the contents of several tokens with a delimiter.
#[derive(Debug, Clone)]
pub struct JoinCommand {
    input_tokens: Vec<String>,
    delimiter: String,
    output_token: Option<String>,
}

impl JoinCommand {
    pub fn new(
        input_tokens: Vec<String>,
        delimiter: impl Into<String>,
        output_token: Option<String>,
    ) -> Self {
        Self {
            input_tokens,
            delimiter: delimiter.into(),
            output_token,
        }
    }
}

#[async_trait]
impl Command for JoinCommand {
    fn name(&self) -> &str {
        self.transform_type()
    }

    async fn execute(
        &self,
        context: &mut dyn WorkflowContext,
        card: Option<&mut dyn CardSink>,
    ) -> Result<Vec<StringRef>, FlowError> {
        // Fails on the first missing token.
        let values = self
            .input_tokens
            .iter()
            .map(|t| require_token(context, t).map(|v| render_inline(&v)))
            .collect::<Result<Vec<_>, _>>()?;
        let joined = values.join(&self.delimiter);

        if let Some(card) = card {
            card.title("Join");
            card.line("inputs", &self.input_tokens.join(", "));
        }

        let mut extra = TransformParams::new();
        extra.insert("tokenCount".to_string(), RefValue::from(values.len()));
        let stored = self
            .store_with_metadata(
                context,
                RefValue::String(joined),
                self.output_token.as_deref(),
                extra,
            )
            .await?;
        Ok(vec![stored])
    }
}

impl TransformCommand for JoinCommand {
    fn transform_type(&self) -> &'static str {
        "Join"
    }

    fn input_tokens(&self) -> Vec<String> {
        self.input_tokens.clone()
    }

    fn transform_params(&self) -> TransformParams {
        let mut params = TransformParams::new();
        params.insert(
            "delimiter".to_string(),
            RefValue::String(self.delimiter.clone()),
        );
        params
    }
}
