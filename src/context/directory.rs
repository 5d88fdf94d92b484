use crate::card::CardSink;
use crate::command::Command;
use crate::context::{read_file_ref, RefIndex, WorkflowContext};
use crate::error::FlowError;
use crate::provenance::render_document;
use crate::reference::decorator::{finalize, Finalized};
use crate::reference::{RefDecorator, StringRef, DEFAULT_EXTENSION};
use crate::types::{RefId, RefValue};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Length of the id fragment appended to a colliding synthesized file name
const DISAMBIGUATOR_LEN: usize = 8;

/// Context that writes every stored ref to `output_dir/{file_name}`.
///
/// A ref is registered only after its file has been written, so every ref in the
/// index that claims a file name has a file on disk. The output directory is
/// treated as append-only; `clear` forgets refs but leaves files in place.
#[derive(Debug)]
pub struct DirectoryContext {
    output_dir: PathBuf,
    default_extension: String,
    index: RefIndex,
    /// File names written by this instance; survives `clear`
    written: HashSet<String>,
    /// Backing file of every ref this instance wrote or loaded; survives `clear`
    paths: HashMap<RefId, PathBuf>,
}

impl DirectoryContext {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            default_extension: DEFAULT_EXTENSION.to_string(),
            index: RefIndex::new(),
            written: HashSet::new(),
            paths: HashMap::new(),
        }
    }

    /// Extension used for synthesized file names.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.default_extension = extension.into();
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path of the file backing `reference`: the written file for stored refs,
    /// the source file for loaded ones. `None` for refs this context never saw.
    pub fn path_for(&self, reference: &StringRef) -> Option<PathBuf> {
        self.paths.get(&reference.id).cloned()
    }

    // Files already written are never rewritten. A name this instance has used
    // (same-millisecond synthesized names, or a repeated explicit name) gets part
    // of the new ref's id appended before the extension.
    fn resolve_collision(&self, finalized: Finalized) -> StringRef {
        let Finalized {
            mut reference,
            synthesized_name,
        } = finalized;

        let Some(name) = reference.file_name.clone() else {
            return reference;
        };
        if !self.written.contains(&name) {
            return reference;
        }

        let fragment: String = reference.id.chars().take(DISAMBIGUATOR_LEN).collect();
        let renamed = match name.rsplit_once('.') {
            Some((stem, ext)) => format!("{}-{}.{}", stem, fragment, ext),
            None => format!("{}-{}", name, fragment),
        };
        warn!(
            original = %name,
            renamed = %renamed,
            explicit = !synthesized_name,
            "File name collided with an earlier write; appending id fragment"
        );
        reference.file_name = Some(renamed);
        reference
    }
}

#[async_trait]
impl WorkflowContext for DirectoryContext {
    fn index(&self) -> &RefIndex {
        &self.index
    }

    async fn store(
        &mut self,
        value: RefValue,
        decorators: Vec<Box<dyn RefDecorator>>,
    ) -> Result<StringRef, FlowError> {
        let finalized = finalize(StringRef::new(value), &decorators, &self.default_extension);
        let reference = self.resolve_collision(finalized);
        let file_name = reference
            .file_name
            .clone()
            .ok_or_else(|| FlowError::CommandFailed("Finalized reference has no file name".to_string()))?;

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| FlowError::io(&self.output_dir, e))?;

        let path = self.output_dir.join(&file_name);
        tokio::fs::write(&path, render_document(&reference))
            .await
            .map_err(|e| FlowError::io(&path, e))?;

        debug!(
            ref_id = %reference.id,
            token = ?reference.token,
            path = %path.display(),
            "Stored reference to disk"
        );
        self.written.insert(file_name);
        self.paths.insert(reference.id.clone(), path);
        self.index.insert(reference.clone());
        Ok(reference)
    }

    async fn load(&mut self, path: &Path, token: Option<&str>) -> Result<StringRef, FlowError> {
        let reference = read_file_ref(path, token).await?;
        debug!(ref_id = %reference.id, path = %path.display(), "Loaded file reference");
        self.paths.insert(reference.id.clone(), path.to_path_buf());
        self.index.insert(reference.clone());
        Ok(reference)
    }

    async fn run(
        &mut self,
        command: &dyn Command,
        card: Option<&mut dyn CardSink>,
    ) -> Result<Vec<StringRef>, FlowError> {
        debug!(command = command.name(), output_dir = %self.output_dir.display(), "Running command");
        command.execute(self, card).await
    }

    fn clear(&mut self) {
        self.index.clear();
    }
}
