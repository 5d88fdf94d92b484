//! String References
//!
//! Immutable records of one stored value plus the lineage trail describing how it
//! was derived. A reference is created once by a context and never updated; a
//! "transformation" always produces a brand-new reference.

pub mod decorator;

use crate::types::{new_ref_id, render_inline, RefId, RefValue};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use decorator::{
    FileNameDecorator, MetadataDecorator, RefDecorator, TimestampedFileNameDecorator,
    TokenDecorator, DEFAULT_EXTENSION,
};

/// One derivation step in a reference's lineage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformMetadata {
    /// Transform name, e.g. `TokenReplace`
    #[serde(rename = "type")]
    pub transform_type: String,
    /// Tokens the transform read
    pub inputs: Vec<String>,
    /// Transform parameters plus step-specific extras
    pub params: BTreeMap<String, RefValue>,
    pub timestamp: DateTime<Utc>,
}

impl TransformMetadata {
    pub fn new(
        transform_type: impl Into<String>,
        inputs: Vec<String>,
        params: BTreeMap<String, RefValue>,
    ) -> Self {
        Self {
            transform_type: transform_type.into(),
            inputs,
            params,
            timestamp: Utc::now(),
        }
    }
}

/// Stored value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StringRef {
    pub id: RefId,
    /// Human-chosen label; the context maps it to the latest ref carrying it
    pub token: Option<String>,
    pub file_name: Option<String>,
    pub content: RefValue,
    pub timestamp: DateTime<Utc>,
    /// Lineage trail, written once at store time
    pub metadata: Vec<TransformMetadata>,
}

impl StringRef {
    /// Base reference for a fresh value: new id, current time, nothing else set.
    pub fn new(content: RefValue) -> Self {
        Self {
            id: new_ref_id(),
            token: None,
            file_name: None,
            content,
            timestamp: Utc::now(),
            metadata: Vec::new(),
        }
    }

    /// Token if present, otherwise id. Used to key synthesized file names.
    pub fn token_or_id(&self) -> &str {
        self.token.as_deref().unwrap_or(&self.id)
    }

    /// Content rendered as text (strings verbatim, other values as JSON).
    pub fn content_text(&self) -> String {
        render_inline(&self.content)
    }
}
