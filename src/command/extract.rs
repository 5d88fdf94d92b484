use super::transform::{TransformCommand, TransformParams};
use super::{require_token, Command};
use crate::card::CardSink;
use crate::context::WorkflowContext;
use crate::error::FlowError;
use crate::reference::StringRef;
use crate::types::{render_inline, RefValue};
use async_trait::async_trait;
use regex::Regex;

/// Compile `pattern`, reporting failures as `InvalidPattern`.
pub(crate) fn compile_pattern(pattern: &str) -> Result<Regex, FlowError> {
    Regex::new(pattern).map_err(|e| FlowError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

/// Pull the first match of a pattern out of a token's content.
///
/// Returns the first capture group when the pattern has one and it
/// participated in the match, otherwise the full match.
#[derive(Debug, Clone)]
pub struct ExtractCommand {
    input_token: String,
    pattern: Regex,
    output_token: Option<String>,
}

impl ExtractCommand {
    pub fn new(
        input_token: impl Into<String>,
        pattern: &str,
        output_token: Option<String>,
    ) -> Result<Self, FlowError> {
        Ok(Self {
            input_token: input_token.into(),
            pattern: compile_pattern(pattern)?,
            output_token,
        })
    }

    fn extract<'a>(&self, text: &'a str) -> Option<&'a str> {
        let caps = self.pattern.captures(text)?;
        caps.get(1).or_else(|| caps.get(0)).map(|m| m.as_str())
    }
}

#[async_trait]
impl Command for ExtractCommand {
    fn name(&self) -> &str {
        self.transform_type()
    }

    async fn execute(
        &self,
        context: &mut dyn WorkflowContext,
        card: Option<&mut dyn CardSink>,
    ) -> Result<Vec<StringRef>, FlowError> {
        let text = render_inline(&require_token(context, &self.input_token)?);
        let extracted = self
            .extract(&text)
            .ok_or_else(|| FlowError::NoMatch {
                transform: self.transform_type().to_string(),
                pattern: self.pattern.as_str().to_string(),
            })?
            .to_string();

        if let Some(card) = card {
            card.title("Extract");
            card.line("input", &self.input_token);
            card.line("pattern", self.pattern.as_str());
            card.line("match", &extracted);
        }

        let stored = self
            .store_with_metadata(
                context,
                RefValue::String(extracted),
                self.output_token.as_deref(),
                TransformParams::new(),
            )
            .await?;
        Ok(vec![stored])
    }
}

impl TransformCommand for ExtractCommand {
    fn transform_type(&self) -> &'static str {
        "Extract"
    }

    fn input_tokens(&self) -> Vec<String> {
        vec![self.input_token.clone()]
    }

    fn transform_params(&self) -> TransformParams {
        let mut params = TransformParams::new();
        params.insert(
            "pattern".to_string(),
            RefValue::String(self.pattern.as_str().to_string()),
        );
        params
    }
}
