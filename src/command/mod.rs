//! Commands
//!
//! A command is a composable unit of work over a context: it reads its inputs by
//! token, computes a result, and stores one or more new refs. Commands are
//! stateless across invocations and never retry.

pub mod extract;
pub mod join;
pub mod load;
pub mod regex_match;
pub mod shell;
pub mod split;
pub mod store;
pub mod token_replace;
pub mod transform;

use crate::card::CardSink;
use crate::context::WorkflowContext;
use crate::error::FlowError;
use crate::reference::StringRef;
use crate::types::RefValue;
use async_trait::async_trait;

pub use extract::ExtractCommand;
pub use join::JoinCommand;
pub use load::LoadCommand;
pub use regex_match::RegexMatchCommand;
pub use shell::ShellCommand;
pub use split::SplitCommand;
pub use store::StoreCommand;
pub use token_replace::TokenReplaceCommand;
pub use transform::TransformCommand;

/// Unit of composable work executed through `WorkflowContext::run`.
#[async_trait]
pub trait Command: Send + Sync {
    /// Short name used in logs and reports.
    fn name(&self) -> &str;

    /// Run against `context`, returning the refs this invocation created.
    ///
    /// `card` only receives progress output; its absence must not change what
    /// gets stored.
    async fn execute(
        &self,
        context: &mut dyn WorkflowContext,
        card: Option<&mut dyn CardSink>,
    ) -> Result<Vec<StringRef>, FlowError>;
}

/// Content stored under `token`, or a `MissingToken` error naming it.
pub fn require_token(context: &dyn WorkflowContext, token: &str) -> Result<RefValue, FlowError> {
    context
        .token(token)
        .cloned()
        .ok_or_else(|| FlowError::missing_token(token))
}
