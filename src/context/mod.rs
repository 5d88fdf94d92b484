//! Workflow Contexts
//!
//! A context owns the reference store and token index. `store` is the only
//! mutation surface; `token` is the synchronous lookup commands use to read
//! their inputs; `run` is the only way to execute a command against the context.
//!
//! Two backends share one `RefIndex`: [`InMemoryContext`] keeps everything in
//! memory, [`DirectoryContext`] additionally writes every stored ref to a file
//! with a provenance frontmatter block.

pub mod directory;
pub mod index;
pub mod memory;

use crate::card::CardSink;
use crate::command::Command;
use crate::config::FlowConfig;
use crate::error::FlowError;
use crate::reference::{RefDecorator, StringRef};
use crate::types::RefValue;
use async_trait::async_trait;
use std::path::Path;

pub use directory::DirectoryContext;
pub use index::RefIndex;
pub use memory::InMemoryContext;

/// Owner of stored references and the token index.
#[async_trait]
pub trait WorkflowContext: Send + Sync {
    /// Read-only view of the index backing this context.
    fn index(&self) -> &RefIndex;

    /// Create a new ref from `value`, fold `decorators` over it in order, apply the
    /// timestamped file-name fallback if needed, persist, then register it.
    async fn store(
        &mut self,
        value: RefValue,
        decorators: Vec<Box<dyn RefDecorator>>,
    ) -> Result<StringRef, FlowError>;

    /// Register the contents of an existing file as a new ref. Never writes a copy.
    async fn load(&mut self, path: &Path, token: Option<&str>) -> Result<StringRef, FlowError>;

    /// Execute `command` against this context. Errors are not caught.
    async fn run(
        &mut self,
        command: &dyn Command,
        card: Option<&mut dyn CardSink>,
    ) -> Result<Vec<StringRef>, FlowError>;

    /// Drop all refs and the token index. Files already written stay on disk.
    fn clear(&mut self);

    /// Content of the most recent ref stored under `name`.
    fn token(&self, name: &str) -> Option<&RefValue> {
        self.index().resolve_token(name).map(|r| &r.content)
    }

    fn get(&self, id: &str) -> Option<&StringRef> {
        self.index().get(id)
    }

    /// Resolve by id, then by token.
    fn lookup(&self, id_or_token: &str) -> Option<&StringRef> {
        self.index().lookup(id_or_token)
    }
}

/// Build the context selected by configuration: directory-backed when an output
/// directory is configured, in-memory otherwise.
pub fn from_config(config: &FlowConfig) -> Box<dyn WorkflowContext> {
    match &config.output_dir {
        Some(dir) => Box::new(
            DirectoryContext::new(dir.clone()).with_extension(config.default_extension.clone()),
        ),
        None => Box::new(InMemoryContext::new().with_extension(config.default_extension.clone())),
    }
}

/// Read `path` into an unregistered ref: fresh id, file name set to the path's
/// basename, optional token, no metadata.
pub(crate) async fn read_file_ref(path: &Path, token: Option<&str>) -> Result<StringRef, FlowError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| FlowError::io(path, e))?;

    let mut reference = StringRef::new(RefValue::String(content));
    reference.file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());
    reference.token = token.map(str::to_string);
    Ok(reference)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_from_config_selects_backend() {
        let mut config = FlowConfig::default();
        let ctx = from_config(&config);
        assert!(ctx.index().is_empty());

        config.output_dir = Some(PathBuf::from("/tmp/refchain-out"));
        let ctx = from_config(&config);
        assert!(ctx.token("anything").is_none());
    }

    #[tokio::test]
    async fn test_from_config_applies_extension_to_both_backends() {
        let temp = tempfile::tempdir().unwrap();
        let mut config = FlowConfig::default();
        config.default_extension = "md".to_string();

        let mut memory = from_config(&config);
        let r = memory
            .store(RefValue::from("m"), vec![crate::reference::decorator::token("note")])
            .await
            .unwrap();
        assert!(r.file_name.unwrap().ends_with("-note.md"));

        config.output_dir = Some(temp.path().to_path_buf());
        let mut directory = from_config(&config);
        let r = directory
            .store(RefValue::from("d"), vec![crate::reference::decorator::token("note")])
            .await
            .unwrap();
        assert!(r.file_name.unwrap().ends_with("-note.md"));
    }

    #[tokio::test]
    async fn test_read_file_ref_uses_basename() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("notes.md");
        std::fs::write(&path, "hello").unwrap();

        let r = read_file_ref(&path, Some("notes")).await.unwrap();
        assert_eq!(r.file_name.as_deref(), Some("notes.md"));
        assert_eq!(r.token.as_deref(), Some("notes"));
        assert_eq!(r.content_text(), "hello");
        assert!(r.metadata.is_empty());
    }

    #[tokio::test]
    async fn test_read_missing_file_is_io_error() {
        let temp = tempfile::tempdir().unwrap();
        let err = read_file_ref(&temp.path().join("absent.txt"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::Io { .. }));
    }
}
