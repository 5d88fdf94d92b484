//! Core types shared by references, contexts, and commands.

/// RefId: UUID v4 string identifying one stored reference
pub type RefId = String;

/// RefValue: payload of a stored reference (strings are `Value::String`)
pub type RefValue = serde_json::Value;

/// Generate a fresh reference id.
pub fn new_ref_id() -> RefId {
    uuid::Uuid::new_v4().to_string()
}

/// Render a value inline: strings verbatim, everything else as compact JSON.
pub fn render_inline(value: &RefValue) -> String {
    match value {
        RefValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Render a value for persistence: strings verbatim, everything else as
/// 2-space indented JSON.
pub fn render_pretty(value: &RefValue) -> String {
    match value {
        RefValue::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}
