//! Shared template for transform commands.
//!
//! A transform declares its type, the tokens it reads, and its parameters;
//! `store_with_metadata` turns those declarations into a lineage entry and stores
//! the result.

use super::Command;
use crate::context::WorkflowContext;
use crate::error::FlowError;
use crate::reference::decorator;
use crate::reference::{RefDecorator, StringRef, TransformMetadata};
use crate::types::RefValue;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Parameter map carried in a lineage entry
pub type TransformParams = BTreeMap<String, RefValue>;

#[async_trait]
pub trait TransformCommand: Command {
    fn transform_type(&self) -> &'static str;

    fn input_tokens(&self) -> Vec<String>;

    fn transform_params(&self) -> TransformParams;

    /// Lineage entry for one invocation; `extra_params` win over declared params.
    fn transform_metadata(&self, extra_params: TransformParams) -> TransformMetadata {
        let mut params = self.transform_params();
        params.extend(extra_params);
        TransformMetadata::new(self.transform_type(), self.input_tokens(), params)
    }

    /// Store `content` with this transform's lineage entry and, if requested, a
    /// token.
    async fn store_with_metadata(
        &self,
        context: &mut dyn WorkflowContext,
        content: RefValue,
        output_token: Option<&str>,
        extra_params: TransformParams,
    ) -> Result<StringRef, FlowError> {
        let mut decorators: Vec<Box<dyn RefDecorator>> =
            vec![decorator::metadata(self.transform_metadata(extra_params))];
        if let Some(token) = output_token {
            decorators.push(decorator::token(token));
        }
        context.store(content, decorators).await
    }
}
