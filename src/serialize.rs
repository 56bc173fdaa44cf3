//! Serializing a binding's current value back into option syntax.

use crate::definition::{OptionKind, OptionSpec};
use crate::output::double_quote;
use crate::parser::Value;

/// Reconstruct canonical option text for one binding.
///
/// - Flag: `--name` when true, nothing when false
/// - Scalar: `--name="value"`, quoted even when empty
/// - Array: `--singular="element"` per element, space-joined
///
/// The declared kind decides the format. A value of another shape is read
/// as its nearest equivalent, so a script assigning a plain string to an
/// array variable still forwards one element.
pub fn opt(spec: &OptionSpec, value: &Value) -> String {
    match &spec.kind {
        OptionKind::Flag => {
            if is_true(value) {
                format!("--{}", spec.name)
            } else {
                String::new()
            }
        }
        OptionKind::Scalar => format!("--{}={}", spec.name, double_quote(scalar_of(value))),
        OptionKind::Array { singular } => items_of(value)
            .iter()
            .map(|item| format!("--{}={}", singular, double_quote(item)))
            .collect::<Vec<_>>()
            .join(" "),
    }
}

fn is_true(value: &Value) -> bool {
    match value {
        Value::Flag(b) => *b,
        Value::Scalar(s) => s == "true",
        Value::Array(items) => items.first().map(String::as_str) == Some("true"),
    }
}

fn scalar_of(value: &Value) -> &str {
    match value {
        Value::Flag(true) => "true",
        Value::Flag(false) => "false",
        Value::Scalar(s) => s.as_str(),
        Value::Array(items) => items.first().map(String::as_str).unwrap_or_default(),
    }
}

fn items_of(value: &Value) -> &[String] {
    match value {
        Value::Flag(_) => &[],
        Value::Scalar(s) => std::slice::from_ref(s),
        Value::Array(items) => items.as_slice(),
    }
}
