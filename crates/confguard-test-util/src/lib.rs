//! Shared test utilities for the confguard workspace.
//!
//! `xtask` uses these at runtime to regenerate golden reports, so they cannot live behind
//! `#[cfg(test)]` in `confguard-types`.

use serde_json::Value;

/// Placeholder written over `tool.version` in report envelopes.
pub const VERSION_PLACEHOLDER: &str = "__VERSION__";

/// Normalize the parts of a JSON report that vary between machines and releases.
///
/// 1. **Root-only**: `tool.version` is replaced when the root object is a report envelope
///    (`schema`, `tool`, `summary`, `results`). Nested lookalikes such as message metadata
///    are left alone.
/// 2. **File names**: when `root` is given, every `filename` under `results` that starts
///    with it is rewritten relative to it, so reports from temporary directories compare
///    equal to checked-in goldens.
pub fn normalize_report(mut value: Value, root: Option<&str>) -> Value {
    let Some(obj) = value.as_object_mut() else {
        return value;
    };
    let is_envelope = ["schema", "tool", "summary", "results"]
        .iter()
        .all(|k| obj.contains_key(*k));
    if !is_envelope {
        return value;
    }

    if let Some(tool) = obj.get_mut("tool").and_then(Value::as_object_mut)
        && tool.contains_key("version")
    {
        tool.insert(
            "version".to_string(),
            Value::String(VERSION_PLACEHOLDER.to_string()),
        );
    }

    if let Some(root) = root
        && let Some(results) = obj.get_mut("results").and_then(Value::as_array_mut)
    {
        let prefix = format!("{}/", root.trim_end_matches('/'));
        for result in results.iter_mut() {
            if let Some(Value::String(name)) = result.get_mut("filename")
                && let Some(rest) = name.strip_prefix(&prefix)
            {
                *name = rest.to_string();
            }
        }
    }
    value
}

/// Replace every occurrence of `root` in a text rendering with `<root>`.
pub fn normalize_text(text: &str, root: &str) -> String {
    text.replace(root.trim_end_matches('/'), "<root>")
}
