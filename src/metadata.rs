//! Normalization of client-supplied evaluation metadata.
//!
//! The `/evaluate` request carries an optional `metadata` field with no fixed
//! schema: it may be absent, a JSON object, or any other JSON value. The
//! scoring engine consumes a single text value, so every shape is flattened
//! to text here. Normalization is total — no metadata shape is ever rejected.

use serde_json::Value;

/// Normalize an untyped `metadata` value into the text form the scoring
/// engine expects.
///
/// Rules:
/// - absent (or JSON `null`) → empty string
/// - JSON object → compact JSON serialization (deterministic: same mapping
///   always yields the same text)
/// - JSON string → the string content itself, without added quotes
/// - anything else → its compact JSON text
///
/// Serialization of an object is best-effort: if it fails, the value's
/// `Display` form is substituted rather than propagating the error, since
/// metadata is advisory context for the engine, not a correctness-critical
/// field.
pub fn normalize(metadata: Option<&Value>) -> String {
    match metadata {
        None | Some(Value::Null) => String::new(),
        Some(obj @ Value::Object(_)) => {
            serde_json::to_string(obj).unwrap_or_else(|_| obj.to_string())
        }
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
