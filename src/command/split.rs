use super::transform::{TransformCommand, TransformParams};
use super::{require_token, Command};
use crate::card::CardSink;
use crate::context::WorkflowContext;
use crate::error::FlowError;
use crate::reference::StringRef;
use crate::types::{render_inline, RefValue};
use async_trait::async_trait;

/// Split a token's content on a delimiter, storing each part as its own ref under
/// `{prefix}-{n}` (1-based). The prefix defaults to `{input}-part`.
#[derive(Debug, Clone)]
pub struct SplitCommand {
    input_token: String,
    delimiter: String,
    output_prefix: Option<String>,
}

impl SplitCommand {
    pub fn new(
        input_token: impl Into<String>,
        delimiter: impl Into<String>,
        output_prefix: Option<String>,
    ) -> Self {
        Self {
            input_token: input_token.into(),
            delimiter: delimiter.into(),
            output_prefix,
        }
    }

    pub fn prefix(&self) -> String {
        self.output_prefix
            .clone()
            .unwrap_or_else(|| format!("{}-part", self.input_token))
    }

    fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
        if self.delimiter.is_empty() {
            // Empty delimiter splits into characters.
            return text
                .char_indices()
                .map(|(i, c)| &text[i..i + c.len_utf8()])
                .collect();
        }
        text.split(self.delimiter.as_str()).collect()
    }
}

#[async_trait]
impl Command for SplitCommand {
    fn name(&self) -> &str {
        self.transform_type()
    }

    async fn execute(
        &self,
        context: &mut dyn WorkflowContext,
        card: Option<&mut dyn CardSink>,
    ) -> Result<Vec<StringRef>, FlowError> {
        let text = render_inline(&require_token(context, &self.input_token)?);
        let parts: Vec<String> = self.split(&text).into_iter().map(str::to_string).collect();
        let total = parts.len();
        let prefix = self.prefix();

        if let Some(card) = card {
            card.title("Split");
            card.line("input", &self.input_token);
            card.line("parts", &total.to_string());
            card.line("tokens", &format!("{}-1..{}-{}", prefix, prefix, total));
        }

        let mut stored = Vec::with_capacity(total);
        for (i, part) in parts.into_iter().enumerate() {
            let part_token = format!("{}-{}", prefix, i + 1);
            let mut extra = TransformParams::new();
            extra.insert("partIndex".to_string(), RefValue::from(i + 1));
            extra.insert("totalParts".to_string(), RefValue::from(total));
            let reference = self
                .store_with_metadata(
                    context,
                    RefValue::String(part),
                    Some(part_token.as_str()),
                    extra,
                )
                .await?;
            stored.push(reference);
        }
        Ok(stored)
    }
}

impl TransformCommand for SplitCommand {
    fn transform_type(&self) -> &'static str {
        "Split"
    }

    fn input_tokens(&self) -> Vec<String> {
        vec![self.input_token.clone()]
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
