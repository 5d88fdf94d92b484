use super::extract::compile_pattern;
use super::transform::{TransformCommand, TransformParams};
use super::{require_token, Command};
use crate::card::CardSink;
use crate::context::WorkflowContext;
use crate::error::FlowError;
use crate::reference::StringRef;
use crate::types::{render_inline, RefValue};
use async_trait::async_trait;
use regex::{Captures, Regex};

/// Collect matches of a pattern into a numbered list.
///
/// With `global` set every non-overlapping match is listed, otherwise only the
/// first. Each line reads `N. <match>`, followed by ` (groups: a, b)` when the
/// pattern has capture groups; non-participating groups render empty.
#[derive(Debug, Clone)]
pub struct RegexMatchCommand {
    input_token: String,
    pattern: Regex,
    global: bool,
    output_token: Option<String>,
}

impl RegexMatchCommand {
    pub fn new(
        input_token: impl Into<String>,
        pattern: &str,
        output_token: Option<String>,
    ) -> Result<Self, FlowError> {
        Ok(Self {
            input_token: input_token.into(),
            pattern: compile_pattern(pattern)?,
            global: true,
            output_token,
        })
    }

    /// Restrict to the first match only.
    pub fn first_only(mut self) -> Self {
        self.global = false;
        self
    }

    fn collect_matches(&self, text: &str) -> Vec<String> {
        let limit = if self.global { usize::MAX } else { 1 };
        self.pattern
            .captures_iter(text)
            .take(limit)
            .enumerate()
            .map(|(i, caps)| format_match(i + 1, &caps))
            .collect()
    }
}

fn format_match(number: usize, caps: &Captures) -> String {
    let full = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
    if caps.len() <= 1 {
        return format!("{}. {}", number, full);
    }
    let groups: Vec<&str> = caps
        .iter()
        .skip(1)
        .map(|g| g.map(|m| m.as_str()).unwrap_or_default())
        .collect();
    format!("{}. {} (groups: {})", number, full, groups.join(", "))
}

#[async_trait]
impl Command for RegexMatchCommand {
    fn name(&self) -> &str {
        self.transform_type()
    }

    async fn execute(
        &self,
        context: &mut dyn WorkflowContext,
        card: Option<&mut dyn CardSink>,
    ) -> Result<Vec<StringRef>, FlowError> {
        let text = render_inline(&require_token(context, &self.input_token)?);
        let matches = self.collect_matches(&text);
        if matches.is_empty() {
            return Err(FlowError::NoMatch {
                transform: self.transform_type().to_string(),
                pattern: self.pattern.as_str().to_string(),
            });
        }

        if let Some(card) = card {
            card.title("Regex match");
            card.line("input", &self.input_token);
            card.line("matches", &matches.len().to_string());
        }

        let mut extra = TransformParams::new();
        extra.insert("matchCount".to_string(), RefValue::from(matches.len()));
        let stored = self
            .store_with_metadata(
                context,
                RefValue::String(matches.join("\n")),
                self.output_token.as_deref(),
                extra,
            )
            .await?;
        Ok(vec![stored])
    }
}

impl TransformCommand for RegexMatchCommand {
    fn transform_type(&self) -> &'static str {
        "RegexMatch"
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
        params.insert("global".to_string(), RefValue::Bool(self.global));
        params
    }
}
