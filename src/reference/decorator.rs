//! Reference decorators.
//!
//! A decorator is a pure function over a `StringRef`: it returns the ref with
//! the fields it owns overwritten and touches nothing else. Contexts fold the
//! caller's decorators left-to-right, then fall back to a timestamped file name
//! only when no decorator assigned one.

use super::{StringRef, TransformMetadata};
use chrono::{DateTime, Utc};

/// Default extension for synthesized file names
pub const DEFAULT_EXTENSION: &str = "txt";

/// Pure enrichment step applied before a reference is finalized.
pub trait RefDecorator: Send + Sync {
    fn decorate(&self, reference: StringRef) -> StringRef;
}

impl<F> RefDecorator for F
where
    F: Fn(StringRef) -> StringRef + Send + Sync,
{
    fn decorate(&self, reference: StringRef) -> StringRef {
        self(reference)
    }
}

/// Sets `token`.
#[derive(Debug, Clone)]
pub struct TokenDecorator {
    token: String,
}

impl TokenDecorator {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl RefDecorator for TokenDecorator {
    fn decorate(&self, mut reference: StringRef) -> StringRef {
        reference.token = Some(self.token.clone());
        reference
    }
}

/// Sets `file_name` verbatim.
#[derive(Debug, Clone)]
pub struct FileNameDecorator {
    file_name: String,
}

impl FileNameDecorator {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }
}

impl RefDecorator for FileNameDecorator {
    fn decorate(&self, mut reference: StringRef) -> StringRef {
        reference.file_name = Some(self.file_name.clone());
        reference
    }
}

/// Synthesizes `{YYYYMMDDTHHMMSS}-{ms}-{key}.{ext}` from the ref's timestamp.
#[derive(Debug, Clone)]
pub struct TimestampedFileNameDecorator {
    key: String,
    extension: String,
}

impl TimestampedFileNameDecorator {
    pub fn new(token_or_id: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            key: token_or_id.into(),
            extension: extension.into(),
        }
    }

    pub fn with_default_extension(token_or_id: impl Into<String>) -> Self {
        Self::new(token_or_id, DEFAULT_EXTENSION)
    }
}

impl RefDecorator for TimestampedFileNameDecorator {
    fn decorate(&self, mut reference: StringRef) -> StringRef {
        reference.file_name = Some(timestamped_file_name(
            &reference.timestamp,
            &self.key,
            &self.extension,
        ));
        reference
    }
}

/// Appends one lineage entry.
#[derive(Debug, Clone)]
pub struct MetadataDecorator {
    metadata: TransformMetadata,
}

impl MetadataDecorator {
    pub fn new(metadata: TransformMetadata) -> Self {
        Self { metadata }
    }
}

impl RefDecorator for MetadataDecorator {
    fn decorate(&self, mut reference: StringRef) -> StringRef {
        reference.metadata.push(self.metadata.clone());
        reference
    }
}

/// Boxed `TokenDecorator`
pub fn token(name: impl Into<String>) -> Box<dyn RefDecorator> {
    Box::new(TokenDecorator::new(name))
}

/// Boxed `FileNameDecorator`
pub fn file_name(name: impl Into<String>) -> Box<dyn RefDecorator> {
    Box::new(FileNameDecorator::new(name))
}

/// Boxed `MetadataDecorator`
pub fn metadata(metadata: TransformMetadata) -> Box<dyn RefDecorator> {
    Box::new(MetadataDecorator::new(metadata))
}

/// Format the timestamped file name for `key`.
pub fn timestamped_file_name(timestamp: &DateTime<Utc>, key: &str, extension: &str) -> String {
    format!(
        "{}-{}-{}.{}",
        timestamp.format("%Y%m%dT%H%M%S"),
        timestamp.format("%3f"),
        key,
        extension
    )
}

/// Result of folding decorators over a base reference.
#[derive(Debug, Clone)]
pub struct Finalized {
    pub reference: StringRef,
    /// True when the file name came from the timestamped fallback
    pub synthesized_name: bool,
}

/// Fold `decorators` left-to-right over `base`, then apply the timestamped
/// fallback keyed on `token ?? id` if no file name was assigned.
pub fn finalize(
    base: StringRef,
    decorators: &[Box<dyn RefDecorator>],
    extension: &str,
) -> Finalized {
    let reference = decorators
        .iter()
        .fold(base, |reference, decorator| decorator.decorate(reference));

    if reference.file_name.is_some() {
        return Finalized {
            reference,
            synthesized_name: false,
        };
    }

    let fallback = TimestampedFileNameDecorator::new(reference.token_or_id(), extension);
    Finalized {
        reference: fallback.decorate(reference),
        synthesized_name: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn fixed_ref() -> StringRef {
        let mut r = StringRef::new(json!("value"));
        r.timestamp = Utc
            .with_ymd_and_hms(2024, 3, 9, 7, 5, 2)
            .unwrap()
            + chrono::Duration::milliseconds(42);
        r
    }

    #[test]
    fn test_timestamped_name_format() {
        let r = fixed_ref();
        let name = timestamped_file_name(&r.timestamp, "greeting", "md");
        assert_eq!(name, "20240309T070502-042-greeting.md");
    }

    #[test]
    fn test_token_decorator_only_sets_token() {
        let r = fixed_ref();
        let before = r.clone();
        let out = TokenDecorator::new("t").decorate(r);
        assert_eq!(out.token.as_deref(), Some("t"));
        assert_eq!(out.id, before.id);
        assert_eq!(out.file_name, before.file_name);
        assert_eq!(out.content, before.content);
        assert_eq!(out.metadata, before.metadata);
    }

    #[test]
    fn test_last_file_name_decorator_wins() {
        let decorators = vec![file_name("a.txt"), file_name("b.txt")];
        let finalized = finalize(fixed_ref(), &decorators, DEFAULT_EXTENSION);
        assert_eq!(finalized.reference.file_name.as_deref(), Some("b.txt"));
        assert!(!finalized.synthesized_name);
    }

    #[test]
    fn test_fallback_uses_token_when_set() {
        let finalized = finalize(fixed_ref(), &[token("t")], DEFAULT_EXTENSION);
        assert_eq!(
            finalized.reference.file_name.as_deref(),
            Some("20240309T070502-042-t.txt")
        );
        assert!(finalized.synthesized_name);
    }

    #[test]
    fn test_fallback_uses_id_without_token() {
        let base = fixed_ref();
        let id = base.id.clone();
        let finalized = finalize(base, &[], "json");
        let name = finalized.reference.file_name.unwrap();
        assert!(name.ends_with(&format!("-{}.json", id)));
    }

    #[test]
    fn test_explicit_name_not_overwritten_by_later_token() {
        let decorators = vec![file_name("keep.txt"), token("late")];
        let finalized = finalize(fixed_ref(), &decorators, DEFAULT_EXTENSION);
        assert_eq!(finalized.reference.file_name.as_deref(), Some("keep.txt"));
        assert_eq!(finalized.reference.token.as_deref(), Some("late"));
    }

    #[test]
    fn test_metadata_decorators_append_in_order() {
        let first = TransformMetadata::new("A", vec![], BTreeMap::new());
        let second = TransformMetadata::new("B", vec![], BTreeMap::new());
        let finalized = finalize(
            fixed_ref(),
            &[metadata(first), metadata(second)],
            DEFAULT_EXTENSION,
        );
        let types: Vec<_> = finalized
            .reference
            .metadata
            .iter()
            .map(|m| m.transform_type.as_str())
            .collect();
        assert_eq!(types, vec!["A", "B"]);
    }

    #[test]
    fn test_closure_decorator() {
        let upper = |mut r: StringRef| {
            r.token = r.token.map(|t| t.to_uppercase());
            r
        };
        let decorators: Vec<Box<dyn RefDecorator>> = vec![token("shout"), Box::new(upper)];
        let finalized = finalize(fixed_ref(), &decorators, DEFAULT_EXTENSION);
        assert_eq!(finalized.reference.token.as_deref(), Some("SHOUT"));
    }
}
