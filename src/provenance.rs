//! Provenance Encoding
//!
//! Renders a reference's lineage as a YAML frontmatter block so persisted files
//! are self-describing. Output is deterministic given the metadata list: one list
//! item per transform, in the order the entries were attached. Nothing reads
//! this block back into structured metadata.

use crate::reference::{StringRef, TransformMetadata};
use crate::types::{render_pretty, RefValue};
use chrono::SecondsFormat;

/// Render the frontmatter block for `metadata`, or an empty string when there is
/// no lineage to record.
pub fn render_frontmatter(metadata: &[TransformMetadata]) -> String {
    if metadata.is_empty() {
        return String::new();
    }

    let mut out = String::from("---\ntransforms:\n");
    for entry in metadata {
        out.push_str(&format!("  - type: {}\n", yaml_scalar(&entry.transform_type)));
        let inputs: Vec<String> = entry.inputs.iter().map(|i| yaml_scalar(i)).collect();
        out.push_str(&format!("    inputs: [{}]\n", inputs.join(", ")));
        if entry.params.is_empty() {
            out.push_str("    params: {}\n");
        } else {
            out.push_str("    params:\n");
            for (key, value) in &entry.params {
                out.push_str(&format!("      {}: {}\n", yaml_scalar(key), json_value(value)));
            }
        }
        out.push_str(&format!(
            "    timestamp: {}\n",
            entry.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
        ));
    }
    out.push_str("---\n\n");
    out
}

/// Full on-disk document for a reference: frontmatter (if any) then content.
pub fn render_document(reference: &StringRef) -> String {
    let mut document = render_frontmatter(&reference.metadata);
    document.push_str(&render_pretty(&reference.content));
    document
}

// JSON is a YAML flow subset, so params are written as JSON.
fn json_value(value: &RefValue) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

// Scalars go through the YAML emitter, which quotes anything that would read
// back as another type. Emitter output that is not single-line flow-safe
// (block scalars, folded lines, bare flow indicators) falls back to a
// double-quoted JSON string.
fn yaml_scalar(text: &str) -> String {
    let quoted = || RefValue::String(text.to_string()).to_string();
    let Ok(rendered) = serde_yaml::to_string(text) else {
        return quoted();
    };
    let rendered = rendered.trim_end();
    let is_quoted = rendered.starts_with(|c: char| c == '\'' || c == '"');
    let flow_safe = !rendered.is_empty()
        && !rendered.contains('\n')
        && !rendered.starts_with(|c: char| c == '|' || c == '>')
        && (is_quoted
            || !rendered
                .chars()
                .any(|c| matches!(c, ',' | '[' | ']' | '{' | '}')));
    if flow_safe {
        rendered.to_string()
    } else {
        quoted()
    }
}
