use crate::card::CardSink;
use crate::command::Command;
use crate::context::{read_file_ref, RefIndex, WorkflowContext};
use crate::error::FlowError;
use crate::reference::decorator::finalize;
use crate::reference::{RefDecorator, StringRef, DEFAULT_EXTENSION};
use crate::types::RefValue;
use async_trait::async_trait;
use std::path::Path;
use tracing::debug;

/// Map-backed context with no persistence.
#[derive(Debug)]
pub struct InMemoryContext {
    index: RefIndex,
    default_extension: String,
}

impl InMemoryContext {
    pub fn new() -> Self {
        Self {
            index: RefIndex::new(),
            default_extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Extension used for synthesized file names.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.default_extension = extension.into();
        self
    }
}

impl Default for InMemoryContext {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WorkflowContext for InMemoryContext {
    fn index(&self) -> &RefIndex {
        &self.index
    }

    async fn store(
        &mut self,
        value: RefValue,
        decorators: Vec<Box<dyn RefDecorator>>,
    ) -> Result<StringRef, FlowError> {
        let reference = finalize(StringRef::new(value), &decorators, &self.default_extension).reference;
        debug!(ref_id = %reference.id, token = ?reference.token, "Stored reference in memory");
        self.index.insert(reference.clone());
        Ok(reference)
    }

    async fn load(&mut self, path: &Path, token: Option<&str>) -> Result<StringRef, FlowError> {
        let reference = read_file_ref(path, token).await?;
        debug!(ref_id = %reference.id, path = %path.display(), "Loaded file into memory");
        self.index.insert(reference.clone());
        Ok(reference)
    }

    async fn run(
        &mut self,
        command: &dyn Command,
        card: Option<&mut dyn CardSink>,
    ) -> Result<Vec<StringRef>, FlowError> {
        debug!(command = command.name(), "Running command");
        command.execute(self, card).await
    }

    fn clear(&mut self) {
        self.index.clear();
    }
}
