//! `{{token}}` substitution.
//!
//! Placeholders whose token resolves are replaced with the token's content
//! (non-strings as compact JSON). Unresolved placeholders are left verbatim and
//! do not raise; callers that need strictness compare the output themselves.

use super::transform::{TransformCommand, TransformParams};
use super::{require_token, Command};
use crate::card::CardSink;
use crate::context::WorkflowContext;
use crate::error::FlowError;
use crate::reference::StringRef;
use crate::types::{render_inline, RefValue};
use async_trait::async_trait;
use regex::{Captures, Regex};
use std::sync::OnceLock;

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\{\{\s*([^{}\s]+)\s*\}\}").expect("placeholder pattern is valid")
    })
}

/// Result of substituting placeholders in one template
#[derive(Debug, Clone, PartialEq)]
pub struct Substitution {
    pub text: String,
    /// Tokens that were substituted, in order of first appearance
    pub replaced: Vec<String>,
    /// Placeholders left in place because their token is not stored
    pub unresolved: Vec<String>,
}

/// Substitute every resolvable `{{name}}` in `template` from `context`.
pub fn substitute_tokens(context: &dyn WorkflowContext, template: &str) -> Substitution {
    let mut replaced = Vec::new();
    let mut unresolved = Vec::new();

    let text = placeholder_regex()
        .replace_all(template, |caps: &Captures| {
            let name = &caps[1];
            match context.token(name) {
                Some(value) => {
                    if !replaced.iter().any(|r| r == name) {
                        replaced.push(name.to_string());
                    }
                    render_inline(value)
                }
                None => {
                    if !unresolved.iter().any(|u| u == name) {
                        unresolved.push(name.to_string());
                    }
                    caps[0].to_string()
                }
            }
        })
        .into_owned();

    Substitution {
        text,
        replaced,
        unresolved,
    }
}

/// Replace `{{token}}` placeholders in the content of `input_token`.
#[derive(Debug, Clone)]
pub struct TokenReplaceCommand {
    input_token: String,
    output_token: Option<String>,
}

impl TokenReplaceCommand {
    pub fn new(input_token: impl Into<String>, output_token: Option<String>) -> Self {
        Self {
            input_token: input_token.into(),
            output_token,
        }
    }
}

#[async_trait]
impl Command for TokenReplaceCommand {
    fn name(&self) -> &str {
        self.transform_type()
    }

    async fn execute(
        &self,
        context: &mut dyn WorkflowContext,
        card: Option<&mut dyn CardSink>,
    ) -> Result<Vec<StringRef>, FlowError> {
        let template = render_inline(&require_token(context, &self.input_token)?);
        let substitution = substitute_tokens(context, &template);

        if !substitution.unresolved.is_empty() {
            tracing::debug!(
                unresolved = ?substitution.unresolved,
                "Leaving unresolved placeholders in place"
            );
        }
        if let Some(card) = card {
            card.title("Token replace");
            card.line("input", &self.input_token);
            card.line("replaced", &substitution.replaced.join(", "));
            if !substitution.unresolved.is_empty() {
                card.line("unresolved", &substitution.unresolved.join(", "));
            }
        }

        let mut extra = TransformParams::new();
        extra.insert(
            "replacedTokens".to_string(),
            RefValue::from(substitution.replaced.clone()),
        );
        let stored = self
            .store_with_metadata(
                context,
                RefValue::String(substitution.text),
                self.output_token.as_deref(),
                extra,
            )
            .await?;
        Ok(vec![stored])
    }
}

impl TransformCommand for TokenReplaceCommand {
    fn transform_type(&self) -> &'static str {
        "TokenReplace"
    }

    fn input_tokens(&self) -> Vec<String> {
        vec![self.input_token.clone()]
    }

    fn transform_params(&self) -> TransformParams {
        TransformParams::new()
    }
}
